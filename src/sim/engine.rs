//! The simulation engine: pointer handling and the per-tick resolver
//!
//! `tick` is free-running: the host calls it once per frame with the
//! current wall-clock in milliseconds, as fast as it likes. There is no
//! fixed timestep because nothing integrates velocity; every correction is
//! purely positional. Delayed merge removal lives in an engine-owned timer
//! queue drained by the tick itself rather than a host timer callback, so
//! ordering is deterministic and tests drive it with a virtual clock.

use glam::Vec2;

use super::collision::{circle_overlap, circles_collide};
use super::drag::DragController;
use super::state::{MergePhase, SimulationState, TokenId};
use crate::consts::MERGE_DELAY_MS;

/// Pointer input, already translated to arena-local coordinates by the shell
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    /// Pointer pressed on a token
    Down { pos: Vec2, target: TokenId },
    /// Pointer moved, dragging if a token is held
    Move { pos: Vec2 },
    /// Pointer released
    Up,
}

/// A merge pair awaiting removal, scheduled at detection time
#[derive(Debug, Clone, Copy)]
struct PendingMerge {
    fire_at_ms: u64,
    pair: [TokenId; 2],
}

/// Owns the state, the drag controller, and the merge timer queue, and
/// advances the simulation one tick at a time
pub struct SimulationEngine {
    state: SimulationState,
    drag: DragController,
    pending: Vec<PendingMerge>,
    /// Wall-clock of the most recent merge detection
    last_merge_ms: u64,
}

impl SimulationEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_state(SimulationState::new(seed))
    }

    pub fn with_state(state: SimulationState) -> Self {
        Self {
            state,
            drag: DragController::new(),
            pending: Vec::new(),
            last_merge_ms: 0,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Id of the token currently held by a drag, if any
    pub fn held(&self) -> Option<TokenId> {
        self.drag.held()
    }

    /// Merge pairs scheduled but not yet removed
    pub fn pending_merges(&self) -> usize {
        self.pending.len()
    }

    /// Apply one pointer event. Runs to completion before any tick, so the
    /// resolver never observes a half-applied drag.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { pos, target } => self.drag.begin(&self.state, pos, target),
            PointerEvent::Move { pos } => self.drag.update(&mut self.state, pos),
            PointerEvent::Up => self.drag.end(),
        }
    }

    /// Advance one frame: drain due merge timers, detect a new merge pair
    /// (drag-gated), then resolve same-kind separation
    pub fn tick(&mut self, now_ms: u64) {
        self.drain_due_merges(now_ms);
        self.detect_merge(now_ms);
        self.resolve_separation();
    }

    /// Remove every pair whose delay has elapsed and respawn one token per
    /// pair. Runs inside the tick, so removal and respawn are indivisible
    /// from any other read of the list.
    fn drain_due_merges(&mut self, now_ms: u64) {
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].fire_at_ms <= now_ms {
                let entry = self.pending.swap_remove(i);
                let removed = self.state.remove_pair(entry.pair[0], entry.pair[1]);
                let spawned = self.state.spawn_random();
                log::debug!(
                    "merge complete: removed {removed} of {}/{}, spawned {spawned}",
                    entry.pair[0],
                    entry.pair[1]
                );
            } else {
                i += 1;
            }
        }
    }

    /// Flag the first opposite-kind contact with the dragged token, in list
    /// order. At most one pair per tick: the pair leaves `Idle` here and is
    /// invisible to every later check until removed.
    fn detect_merge(&mut self, now_ms: u64) {
        let Some(held_id) = self.drag.held() else { return };
        let Some(dragged) = self.state.get(held_id) else { return };
        if dragged.phase != MergePhase::Idle {
            return;
        }
        let (d_pos, d_radius, d_kind) = (dragged.pos, dragged.radius, dragged.kind);

        let hit = self.state.tokens().iter().find(|other| {
            other.id != held_id
                && other.phase == MergePhase::Idle
                && other.kind != d_kind
                && circles_collide(d_pos, d_radius, other.pos, other.radius)
        });
        let Some(other_id) = hit.map(|t| t.id) else { return };

        for id in [held_id, other_id] {
            if let Some(token) = self.state.get_mut(id) {
                token.phase = MergePhase::Merging;
            }
        }
        self.pending.push(PendingMerge {
            fire_at_ms: now_ms + MERGE_DELAY_MS,
            pair: [held_id, other_id],
        });
        log::debug!(
            "merge scheduled: {held_id} + {other_id}, {}ms since last",
            now_ms.saturating_sub(self.last_merge_ms)
        );
        self.last_merge_ms = now_ms;
    }

    /// Push apart every overlapping same-kind Idle pair by half the
    /// penetration each, skipping displacement of the held token, then
    /// clamp to the arena
    fn resolve_separation(&mut self) {
        let held = self.drag.held();
        let arena = self.state.arena();
        let tokens = self.state.tokens_mut();

        for i in 0..tokens.len() {
            for j in (i + 1)..tokens.len() {
                let (head, tail) = tokens.split_at_mut(j);
                let c1 = &mut head[i];
                let c2 = &mut tail[0];

                if c1.kind != c2.kind
                    || c1.phase != MergePhase::Idle
                    || c2.phase != MergePhase::Idle
                {
                    continue;
                }
                let Some(overlap) = circle_overlap(c1.pos, c1.radius, c2.pos, c2.radius) else {
                    continue;
                };

                let shift = overlap.direction * overlap.push;
                if held != Some(c1.id) {
                    c1.pos -= shift;
                }
                if held != Some(c2.id) {
                    c2.pos += shift;
                }
                c1.pos = arena.clamp(c1.pos, c1.radius);
                c2.pos = arena.clamp(c2.pos, c2.radius);
            }
        }
    }
}
