//! Institution onboarding wizard.
//!
//! Pure-logic building blocks, leaves first: [`steps`] and [`form`] define
//! the data, [`validator`] checks one step, [`draft`] persists the form,
//! [`payload`] flattens it for the creation endpoint, and [`controller`]
//! orchestrates all of them for one wizard screen.

pub mod controller;
pub mod draft;
pub mod form;
pub mod payload;
pub mod steps;
pub mod validator;

pub use controller::{CreatedInstitution, CreationEndpoint, SubmitOutcome, WizardController};
pub use draft::{DraftStorage, DraftStore, FileStorage, MemoryStorage, DRAFT_KEY};
pub use form::{FieldValue, FileHandle, InstitutionForm, InstitutionType};
pub use payload::SubmissionPayload;
pub use steps::{StepDefinition, WizardStep, STEPS};
pub use validator::{validate_step, ValidationErrors};
