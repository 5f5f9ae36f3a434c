//! Token model and authoritative simulation state
//!
//! `SimulationState` owns the live token list and the arena bounds. It is
//! pure storage: the engine mutates it through the accessors here, and the
//! presentation shell reads `tokens()` to draw a frame. Handlers run to
//! completion on a single logical thread, so every read between ticks sees
//! a fully-resolved list.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable token identifier
///
/// A newtype keeps ids from mixing with slot indices into the token list;
/// slots shift on removal, ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two token kinds. Same kinds repel on overlap; opposite kinds
/// annihilate on dragged contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Drawn blue by the shell
    Alpha,
    /// Drawn red by the shell
    Charlie,
}

/// Merge lifecycle flag. A `Merging` token is inert scenery until its
/// removal timer fires: no separation, no re-detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergePhase {
    #[default]
    Idle,
    Merging,
}

/// A circular token, the sole simulated entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub kind: TokenKind,
    /// Circle center in arena coordinates
    pub pos: Vec2,
    pub radius: f32,
    pub phase: MergePhase,
}

/// Rectangular arena bounds
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a circle center so the full circle stays inside the bounds
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, self.width - radius),
            pos.y.clamp(radius, self.height - radius),
        )
    }

    /// Whether a circle at `pos` lies fully inside the bounds
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= radius
            && pos.x <= self.width - radius
            && pos.y >= radius
            && pos.y <= self.height - radius
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

/// Authoritative simulation state: live tokens plus arena bounds
pub struct SimulationState {
    arena: Arena,
    tokens: Vec<Token>,
    /// Slot lookup by id, kept in sync with `tokens`
    index: HashMap<TokenId, usize>,
    /// Monotonic id counter shared by the initial cohorts and respawns
    next_id: u32,
    rng: Pcg32,
    seed: u64,
}

impl SimulationState {
    /// Standard arena: `INITIAL_PER_KIND` tokens of each kind at uniform
    /// random positions (not overlap-checked).
    pub fn new(seed: u64) -> Self {
        let mut state = Self::empty(seed);
        for _ in 0..INITIAL_PER_KIND {
            state.spawn(TokenKind::Alpha);
        }
        for _ in 0..INITIAL_PER_KIND {
            state.spawn(TokenKind::Charlie);
        }
        state
    }

    /// An empty arena; callers place tokens explicitly with [`Self::spawn_at`]
    pub fn empty(seed: u64) -> Self {
        Self {
            arena: Arena::default(),
            tokens: Vec::new(),
            index: HashMap::new(),
            next_id: 0,
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Run seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    /// Render feed: every live token, in list order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.index.get(&id).map(|&slot| &self.tokens[slot])
    }

    pub fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.index.get(&id).map(|&slot| &mut self.tokens[slot])
    }

    fn next_token_id(&mut self) -> TokenId {
        let id = TokenId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a token of the given kind at an explicit position, clamped to
    /// the arena
    pub fn spawn_at(&mut self, kind: TokenKind, pos: Vec2) -> TokenId {
        let id = self.next_token_id();
        let pos = self.arena.clamp(pos, TOKEN_RADIUS);
        self.index.insert(id, self.tokens.len());
        self.tokens.push(Token {
            id,
            kind,
            pos,
            radius: TOKEN_RADIUS,
            phase: MergePhase::Idle,
        });
        id
    }

    /// Spawn a token of the given kind at a uniform random in-bounds position
    pub fn spawn(&mut self, kind: TokenKind) -> TokenId {
        let pos = Vec2::new(
            self.rng.random_range(TOKEN_RADIUS..self.arena.width - TOKEN_RADIUS),
            self.rng.random_range(TOKEN_RADIUS..self.arena.height - TOKEN_RADIUS),
        );
        self.spawn_at(kind, pos)
    }

    /// Respawn after a completed merge: random kind, random position
    pub fn spawn_random(&mut self) -> TokenId {
        let kind = if self.rng.random_bool(0.5) {
            TokenKind::Alpha
        } else {
            TokenKind::Charlie
        };
        self.spawn(kind)
    }

    /// Remove both members of a merge pair by identity. Ids that are already
    /// gone are ignored; returns how many tokens were actually removed.
    pub fn remove_pair(&mut self, a: TokenId, b: TokenId) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|t| t.id != a && t.id != b);
        let removed = before - self.tokens.len();
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (slot, token) in self.tokens.iter().enumerate() {
            self.index.insert(token.id, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_population() {
        let state = SimulationState::new(12345);
        assert_eq!(state.len(), INITIAL_PER_KIND * 2);

        let alphas = state
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Alpha)
            .count();
        assert_eq!(alphas, INITIAL_PER_KIND);

        for token in state.tokens() {
            assert_eq!(token.phase, MergePhase::Idle);
            assert_eq!(token.radius, TOKEN_RADIUS);
            assert!(state.arena().contains(token.pos, token.radius));
        }

        let mut ids: Vec<_> = state.tokens().iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), INITIAL_PER_KIND * 2);
    }

    #[test]
    fn test_determinism() {
        let a = SimulationState::new(99999);
        let b = SimulationState::new(99999);
        for (x, y) in a.tokens().iter().zip(b.tokens()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.kind, y.kind);
            assert!((x.pos - y.pos).length() < 1e-6);
        }
    }

    #[test]
    fn test_spawn_ids_continue_after_removal() {
        let mut state = SimulationState::new(7);
        let first = state.tokens()[0].id;
        let second = state.tokens()[1].id;
        assert_eq!(state.remove_pair(first, second), 2);

        let respawn = state.spawn_random();
        assert_eq!(respawn, TokenId(10));
        assert!(state.get(first).is_none());
        assert!(state.get(respawn).is_some());
    }

    #[test]
    fn test_remove_pair_ignores_missing_ids() {
        let mut state = SimulationState::new(7);
        let live = state.tokens()[0].id;
        assert_eq!(state.remove_pair(live, TokenId(999)), 1);
        assert_eq!(state.remove_pair(TokenId(998), TokenId(999)), 0);
        assert_eq!(state.len(), 9);
    }

    #[test]
    fn test_index_tracks_slots_after_removal() {
        let mut state = SimulationState::new(42);
        let victim_a = state.tokens()[2].id;
        let victim_b = state.tokens()[5].id;
        state.remove_pair(victim_a, victim_b);

        for token in state.tokens() {
            let found = state.get(token.id).expect("live id resolves");
            assert_eq!(found.id, token.id);
        }
    }

    #[test]
    fn test_spawn_at_clamps() {
        let mut state = SimulationState::empty(1);
        let id = state.spawn_at(TokenKind::Alpha, Vec2::new(-50.0, 10_000.0));
        let token = state.get(id).unwrap();
        assert_eq!(token.pos, Vec2::new(TOKEN_RADIUS, ARENA_HEIGHT - TOKEN_RADIUS));
    }

    #[test]
    fn test_arena_clamp() {
        let arena = Arena::default();
        assert_eq!(arena.clamp(Vec2::new(0.0, 0.0), 30.0), Vec2::new(30.0, 30.0));
        assert_eq!(
            arena.clamp(Vec2::new(900.0, 700.0), 30.0),
            Vec2::new(770.0, 570.0)
        );

        let inside = Vec2::new(400.0, 300.0);
        assert_eq!(arena.clamp(inside, 30.0), inside);
    }
}
