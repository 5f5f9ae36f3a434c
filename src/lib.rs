//! Merge Arena - a drag-to-merge circle toy
//!
//! Circular tokens of two kinds drift in a bounded arena. Same kinds repel
//! when they overlap; dragging a token onto one of the opposite kind flags
//! the pair for a delayed annihilation, after which a single replacement
//! token spawns.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tokens, drag control, collision
//!   resolution, merge timers)
//!
//! The presentation shell (canvas drawing, event wiring) lives in `main.rs`
//! and is replaceable; the contract is pointer events in, token snapshots
//! out.

pub mod sim;

/// Simulation configuration constants
pub mod consts {
    /// Arena dimensions in arena units
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Every token is the same size
    pub const TOKEN_RADIUS: f32 = 30.0;

    /// Wall-clock delay between a pair entering `Merging` and its removal
    pub const MERGE_DELAY_MS: u64 = 2000;

    /// Tokens of each kind spawned at simulation start
    pub const INITIAL_PER_KIND: usize = 5;
}
