//! Deterministic simulation module
//!
//! All toy logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time injected by the caller (virtual clock in tests)
//! - Stable iteration order (live list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod drag;
pub mod engine;
pub mod state;

pub use collision::{Overlap, circle_overlap, circles_collide};
pub use drag::DragController;
pub use engine::{PointerEvent, SimulationEngine};
pub use state::{Arena, MergePhase, SimulationState, Token, TokenId, TokenKind};
