//! Optimistic state changes with exact rollback.
//!
//! Used by toggle-style actions (follow/unfollow): show the speculative
//! state immediately, send the request, then either adopt the server's
//! answer or restore precisely what was shown before.

use serde::{Deserialize, Serialize};

/// Follow state of an institution or profile as seen by the current user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowState {
    pub is_following: bool,
    pub follower_count: u64,
}

impl FollowState {
    /// The state after one follow/unfollow click. Applying it twice gives
    /// back the original.
    pub fn toggled(self) -> Self {
        if self.is_following {
            Self {
                is_following: false,
                follower_count: self.follower_count.saturating_sub(1),
            }
        } else {
            Self {
                is_following: true,
                follower_count: self.follower_count + 1,
            }
        }
    }
}

/// A value with at most one speculative change in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimistic<T> {
    current: T,
    previous: Option<T>,
}

impl<T: Clone> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            previous: None,
        }
    }

    /// What should be displayed right now.
    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn is_pending(&self) -> bool {
        self.previous.is_some()
    }

    /// Show `next` speculatively, remembering what it replaced.
    ///
    /// Applying again while a change is pending keeps the oldest confirmed
    /// value as the rollback target.
    pub fn apply(&mut self, next: T) {
        let prev = std::mem::replace(&mut self.current, next);
        if self.previous.is_none() {
            self.previous = Some(prev);
        }
    }

    /// The request succeeded: adopt the server's state.
    pub fn commit(&mut self, confirmed: T) {
        self.current = confirmed;
        self.previous = None;
    }

    /// The request failed: put back exactly what was shown before
    /// [`apply`](Self::apply).
    pub fn rollback(&mut self) {
        if let Some(prev) = self.previous.take() {
            self.current = prev;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
