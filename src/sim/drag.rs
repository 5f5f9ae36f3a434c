//! Pointer drag control
//!
//! At most one token is held at a time. The controller stores the offset
//! between the pointer and the token center at grab time so the token does
//! not snap to the cursor, and writes clamped positions straight into the
//! state. The engine reads `held()` to exempt the token from separation.

use glam::Vec2;

use super::state::{SimulationState, TokenId};

#[derive(Debug, Clone, Copy)]
struct Grab {
    id: TokenId,
    /// Pointer position minus token center at grab time
    offset: Vec2,
}

/// Tracks the held token for the duration of a pointer interaction
#[derive(Debug, Default)]
pub struct DragController {
    held: Option<Grab>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start holding `id`. No effect if another drag is active or the token
    /// does not exist.
    pub fn begin(&mut self, state: &SimulationState, pointer: Vec2, id: TokenId) {
        if self.held.is_some() {
            return;
        }
        if let Some(token) = state.get(id) {
            self.held = Some(Grab {
                id,
                offset: pointer - token.pos,
            });
        }
    }

    /// Move the held token to `pointer - offset`, clamped to the arena.
    /// No-op without an active drag, or when the held token was removed out
    /// from under the drag by a completed merge.
    pub fn update(&mut self, state: &mut SimulationState, pointer: Vec2) {
        let Some(grab) = self.held else { return };
        let arena = state.arena();
        if let Some(token) = state.get_mut(grab.id) {
            token.pos = arena.clamp(pointer - grab.offset, token.radius);
        }
    }

    /// Release the held token. Idempotent.
    pub fn end(&mut self) {
        self.held = None;
    }

    /// Id of the held token while a drag is active
    pub fn held(&self) -> Option<TokenId> {
        self.held.map(|grab| grab.id)
    }

    pub fn is_active(&self) -> bool {
        self.held.is_some()
    }
}
