//! `eduhire-core` -- client-side domain logic for the eduhire platform.
//!
//! Everything here is pure state management with no HTTP dependency:
//!
//! - [`wizard`] -- the institution onboarding wizard: typed form, step
//!   validator, draft persistence, multipart payload, and the controller
//!   that ties them together.
//! - [`curriculum`] -- course sections and lessons, plus the drag-and-drop
//!   reorder engine.
//! - [`optimistic`] -- two-phase speculative state changes with exact
//!   rollback (follow/unfollow).

pub mod curriculum;
pub mod error;
pub mod optimistic;
pub mod types;
pub mod wizard;
