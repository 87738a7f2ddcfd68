//! Wizard controller: navigation, edits, and final submission.
//!
//! The controller owns everything a wizard screen needs: the current step,
//! the form, the validation errors, and the draft store. Every edit is
//! written through to the draft store; a confirmed submission clears it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ServerId;

use super::draft::{DraftStorage, DraftStore};
use super::form::{
    AcademicFields, ContactFields, FieldValue, IdentityFields, InfrastructureFields,
    InstitutionForm,
};
use super::payload::SubmissionPayload;
use super::steps::{clamp_step, WizardStep, MAX_STEP, MIN_STEP};
use super::validator::{validate_step, ValidationErrors};

// ---------------------------------------------------------------------------
// Creation endpoint
// ---------------------------------------------------------------------------

/// A freshly created institution.
///
/// The create endpoint may answer with only the submitted fields, so the
/// server identifiers are optional. `name` is always present; endpoints
/// fill it from the submitted form when the response lacks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedInstitution {
    pub id: Option<ServerId>,
    pub slug: Option<String>,
    pub name: String,
}

/// The remote endpoint that turns a submitted form into an institution.
///
/// The error's `Display` output is shown to the user verbatim.
#[async_trait]
pub trait CreationEndpoint: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn create_institution(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<CreatedInstitution, Self::Error>;
}

/// Result of [`WizardController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The institution exists; the draft has been cleared.
    Created(CreatedInstitution),
    /// Validation failed; nothing was sent.
    Invalid,
    /// The endpoint rejected the submission; `errors().submit()` carries
    /// the same message.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct WizardController<S> {
    current_step: u8,
    form: InstitutionForm,
    errors: ValidationErrors,
    submitting: bool,
    drafts: DraftStore<S>,
}

impl<S: DraftStorage> WizardController<S> {
    /// Start the wizard on step 1 with whatever draft the store holds.
    pub fn new(drafts: DraftStore<S>) -> Self {
        let form = drafts.load();
        Self {
            current_step: MIN_STEP,
            form,
            errors: ValidationErrors::new(),
            submitting: false,
            drafts,
        }
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn step(&self) -> WizardStep {
        // current_step is clamped on every write.
        WizardStep::from_number(self.current_step).unwrap_or(WizardStep::Identity)
    }

    pub fn form(&self) -> &InstitutionForm {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn drafts(&self) -> &DraftStore<S> {
        &self.drafts
    }

    // -- navigation --

    /// Validate the current step and advance if it is clean.
    ///
    /// Returns `true` when the step changed. On the last step a clean
    /// validation clears errors but stays put.
    pub fn next(&mut self) -> bool {
        let errors = validate_step(self.step(), &self.form);
        if !errors.is_empty() {
            tracing::debug!(step = self.current_step, errors = errors.len(), "Step blocked");
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        let next = clamp_step(self.current_step.saturating_add(1));
        let moved = next != self.current_step;
        self.current_step = next;
        moved
    }

    /// Go back one step without validating.
    pub fn prev(&mut self) {
        self.current_step = clamp_step(self.current_step.saturating_sub(1));
    }

    /// Go straight to `step` (step indicator click). No validation gate.
    pub fn jump_to(&mut self, step: u8) {
        self.current_step = clamp_step(step);
    }

    // -- edits --

    /// Set one field by name, clear that field's error, persist the draft.
    pub fn update_field(&mut self, name: &str, value: FieldValue) -> Result<(), CoreError> {
        self.form.set_field(name, value)?;
        self.errors.clear_field(name);
        self.persist();
        Ok(())
    }

    pub fn update_identity(&mut self, edit: impl FnOnce(&mut IdentityFields)) {
        edit(&mut self.form.identity);
        self.after_group_edit(IdentityFields::FIELDS);
    }

    pub fn update_academics(&mut self, edit: impl FnOnce(&mut AcademicFields)) {
        edit(&mut self.form.academics);
        self.after_group_edit(AcademicFields::FIELDS);
    }

    pub fn update_infrastructure(&mut self, edit: impl FnOnce(&mut InfrastructureFields)) {
        edit(&mut self.form.infrastructure);
        self.after_group_edit(InfrastructureFields::FIELDS);
    }

    pub fn update_contact(&mut self, edit: impl FnOnce(&mut ContactFields)) {
        edit(&mut self.form.contact);
        self.after_group_edit(ContactFields::FIELDS);
    }

    fn after_group_edit(&mut self, fields: &[&str]) {
        for field in fields {
            self.errors.clear_field(field);
        }
        self.persist();
    }

    /// Write the draft. Storage failures are logged, never surfaced.
    fn persist(&mut self) {
        if let Err(e) = self.drafts.save(&self.form) {
            tracing::warn!(error = %e, "Failed to persist wizard draft");
        }
    }

    // -- submission --

    /// Validate everything and send the form to `endpoint`.
    ///
    /// On success the draft is cleared. On failure the form, the step and
    /// the draft are all kept and the message lands in `errors().submit()`.
    /// There are no retries.
    pub async fn submit<E: CreationEndpoint>(&mut self, endpoint: &E) -> SubmitOutcome {
        let errors = validate_step(WizardStep::Review, &self.form);
        if !errors.is_empty() {
            tracing::info!(errors = errors.len(), "Submission blocked by validation");
            self.errors = errors;
            return SubmitOutcome::Invalid;
        }
        self.errors.clear();

        let payload = SubmissionPayload::from_form(&self.form);
        self.submitting = true;
        let result = endpoint.create_institution(&payload).await;
        self.submitting = false;

        match result {
            Ok(created) => {
                tracing::info!(name = %created.name, slug = ?created.slug, "Institution created");
                if let Err(e) = self.drafts.clear() {
                    tracing::warn!(error = %e, "Failed to clear wizard draft");
                }
                SubmitOutcome::Created(created)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "Institution submission failed");
                self.errors.set_submit(message.clone());
                self.current_step = MAX_STEP;
                self.persist();
                SubmitOutcome::Failed { message }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
