//! Swipe-to-delete gesture recognition.
//!
//! Tracks one pointer interaction per row and classifies it at release.
//! Coordinates are plain integers (terminal cells here, but the tracker
//! does not care about the unit); time is injected so classification is
//! deterministic under test.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Fraction of the swipe threshold at which a gesture arms and commits.
pub const ARM_RATIO: f32 = 0.6;

#[derive(Debug, Clone, Copy)]
pub struct SwipeConfig {
    /// Maximum visual offset; arm/commit point is `ARM_RATIO` of this.
    pub threshold: f32,
    /// Gestures slower than this never delete.
    pub time_limit: Duration,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold: 12.0,
            time_limit: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Ephemeral per-row state, alive from pointer-down to pointer-up/cancel.
#[derive(Debug, Clone, Copy)]
struct GestureState {
    start_x: i32,
    start_y: i32,
    current_x: i32,
    started_at: Instant,
    #[allow(dead_code)]
    kind: PointerKind,
}

/// What a pointer-move did to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeUpdate {
    /// Horizontal move: the host applies the offset and suppresses any
    /// default scroll behavior it has.
    Horizontal { offset: u16, armed: bool },
    /// Dominantly vertical move: ignored, scrolling stays with the host.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Delete,
    Reset,
}

/// Owns all active gesture state, keyed by row id.
///
/// At most one state per row: a second pointer-down overwrites, and every
/// pointer-up or cancel removes the state, so nothing leaks across
/// interactions.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    config: SwipeConfig,
    states: HashMap<Uuid, GestureState>,
}

impl SwipeTracker {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
        }
    }

    fn commit_distance(&self) -> f32 {
        self.config.threshold * ARM_RATIO
    }

    pub fn pointer_down(&mut self, row: Uuid, x: i32, y: i32, kind: PointerKind, now: Instant) {
        self.states.insert(
            row,
            GestureState {
                start_x: x,
                start_y: y,
                current_x: x,
                started_at: now,
                kind,
            },
        );
    }

    /// Updates the gesture for `row`. Returns `None` when the row has no
    /// active state (stray move, normal pointer activity).
    pub fn pointer_move(&mut self, row: Uuid, x: i32, y: i32) -> Option<SwipeUpdate> {
        let state = self.states.get_mut(&row)?;
        let dx = x - state.start_x;
        let dy = y - state.start_y;
        if dy.abs() > dx.abs() {
            // Vertical wins: no horizontal effect for this move.
            return Some(SwipeUpdate::Vertical);
        }
        state.current_x = x;
        Some(self.visual_for(dx))
    }

    /// Resolves the gesture for `row` and discards its state. Returns
    /// `None` when there is nothing to resolve, so a duplicate pointer-up
    /// is a no-op.
    pub fn pointer_up(&mut self, row: Uuid, now: Instant) -> Option<SwipeOutcome> {
        let state = self.states.remove(&row)?;
        let dx = (state.current_x - state.start_x) as f32;
        let distance = dx.abs();
        let elapsed = now.saturating_duration_since(state.started_at);

        let commit = self.commit_distance();
        let outcome = if dx <= -commit && distance >= commit && elapsed < self.config.time_limit {
            SwipeOutcome::Delete
        } else {
            SwipeOutcome::Reset
        };
        Some(outcome)
    }

    /// Drops the state for `row` without classifying (pointer cancel).
    pub fn cancel(&mut self, row: Uuid) {
        self.states.remove(&row);
    }

    /// Drops all state. Called whenever the row set is re-rendered, since
    /// gestures do not survive a re-render.
    pub fn cancel_all(&mut self) {
        self.states.clear();
    }

    /// Current visual offset for a row, for rendering.
    pub fn offset(&self, row: Uuid) -> Option<(u16, bool)> {
        let state = self.states.get(&row)?;
        match self.visual_for(state.current_x - state.start_x) {
            SwipeUpdate::Horizontal { offset, armed } => Some((offset, armed)),
            SwipeUpdate::Vertical => None,
        }
    }

    pub fn is_tracking(&self, row: Uuid) -> bool {
        self.states.contains_key(&row)
    }

    fn visual_for(&self, dx: i32) -> SwipeUpdate {
        // Only leftward motion moves the row.
        if dx >= 0 {
            return SwipeUpdate::Horizontal {
                offset: 0,
                armed: false,
            };
        }
        let offset = (dx.abs() as f32).min(self.config.threshold);
        SwipeUpdate::Horizontal {
            offset: offset as u16,
            armed: offset > self.commit_distance(),
        }
    }
}
