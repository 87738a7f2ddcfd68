//! Per-step validation of the institution form.
//!
//! Validation results are data, not errors: a non-empty
//! [`ValidationErrors`] blocks forward navigation and is rendered next to
//! the offending inputs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::form::InstitutionForm;
use super::steps::WizardStep;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Map-provider URLs accepted for `google_maps_url`: google.*/maps,
/// maps.google.*, goo.gl/maps and maps.app.goo.gl short links.
pub const MAP_URL_PATTERN: &str = r"(?i)^https?://(?:(?:www\.)?google\.[a-z]{2,3}(?:\.[a-z]{2})?/maps|maps\.google\.[a-z]{2,3}(?:\.[a-z]{2})?|goo\.gl/maps|maps\.app\.goo\.gl)(?:[/?#]\S*)?$";

static MAP_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MAP_URL_PATTERN).expect("valid regex"));

static WEBSITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/]+\.[^\s]+$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("valid regex"));

/// Earliest establishment year accepted.
pub const MIN_ESTABLISHMENT_YEAR: u16 = 1800;

/// Latest establishment year accepted.
pub const MAX_ESTABLISHMENT_YEAR: u16 = 2100;

/// Key under which a failed submission's message is stored.
pub const SUBMIT_ERROR_KEY: &str = "submit";

// ---------------------------------------------------------------------------
// ValidationErrors
// ---------------------------------------------------------------------------

/// Field name → human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Record an error. The first message for a field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Remove the error for one field, leaving every other entry alone.
    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The non-field submission error, if any.
    pub fn submit(&self) -> Option<&str> {
        self.get(SUBMIT_ERROR_KEY)
    }

    pub fn set_submit(&mut self, message: impl Into<String>) {
        self.0.insert(SUBMIT_ERROR_KEY.to_string(), message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn extend(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the fields belonging to `step`.
///
/// Pure: the form is only read. The review step re-checks every earlier
/// step so a form reached through direct step navigation can not be
/// submitted with required fields missing.
pub fn validate_step(step: WizardStep, form: &InstitutionForm) -> ValidationErrors {
    match step {
        WizardStep::Identity => validate_identity(form),
        WizardStep::Academics | WizardStep::Infrastructure => ValidationErrors::new(),
        WizardStep::Contact => validate_contact(form),
        WizardStep::Review => {
            let mut errors = validate_identity(form);
            errors.extend(validate_contact(form));
            errors
        }
    }
}

/// Whether the map URL is empty or points at a recognized map provider.
pub fn is_valid_map_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || MAP_URL_RE.is_match(url)
}

fn validate_identity(form: &InstitutionForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let identity = &form.identity;

    if identity.name.trim().is_empty() {
        errors.insert("name", "Institution name is required");
    }

    let website = identity.website.trim();
    if !website.is_empty() && !WEBSITE_RE.is_match(website) {
        errors.insert("website", "Enter a valid website URL starting with http:// or https://");
    }

    if let Some(year) = identity.establishment_year {
        if !(MIN_ESTABLISHMENT_YEAR..=MAX_ESTABLISHMENT_YEAR).contains(&year) {
            errors.insert(
                "establishment_year",
                format!(
                    "Establishment year must be between {MIN_ESTABLISHMENT_YEAR} and {MAX_ESTABLISHMENT_YEAR}"
                ),
            );
        }
    }

    errors
}

fn validate_contact(form: &InstitutionForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let contact = &form.contact;

    if contact.city.trim().is_empty() {
        errors.insert("city", "City is required");
    }

    if !is_valid_map_url(&contact.google_maps_url) {
        errors.insert("google_maps_url", "Enter a valid Google Maps URL");
    }

    let email = contact.official_email.trim();
    if !email.is_empty() && !EMAIL_RE.is_match(email) {
        errors.insert("official_email", "Enter a valid email address");
    }

    let pincode = contact.pincode.trim();
    if !pincode.is_empty() && !PINCODE_RE.is_match(pincode) {
        errors.insert("pincode", "Pincode must be 6 digits");
    }

    errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
