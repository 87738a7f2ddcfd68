//! HTTP client for the eduhire REST API.
//!
//! Provides [`ApiClient`] which implements the core crate's
//! [`CreationEndpoint`](eduhire_core::wizard::CreationEndpoint) so the
//! institution wizard can submit to a live backend, plus the curriculum and
//! follow endpoints.

pub mod api;
pub mod config;
pub mod error;
pub mod records;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use records::{CreatedItem, FollowResponse, LessonRecord, SectionRecord};
