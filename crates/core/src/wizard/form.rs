//! Typed institution form.
//!
//! The form is grouped the way the wizard screens are: identity, academics,
//! infrastructure, contact. Media uploads live in their own group that is
//! never serialized, so a persisted draft can not carry file contents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Kind of institution being registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstitutionType {
    #[default]
    School,
    College,
    University,
    Coaching,
    Edtech,
    Other,
}

/// Valid wire values for [`InstitutionType`].
pub const VALID_INSTITUTION_TYPES: &[&str] = &[
    "SCHOOL",
    "COLLEGE",
    "UNIVERSITY",
    "COACHING",
    "EDTECH",
    "OTHER",
];

impl InstitutionType {
    /// Parse the wire value (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCHOOL" => Ok(Self::School),
            "COLLEGE" => Ok(Self::College),
            "UNIVERSITY" => Ok(Self::University),
            "COACHING" => Ok(Self::Coaching),
            "EDTECH" => Ok(Self::Edtech),
            "OTHER" => Ok(Self::Other),
            _ => Err(CoreError::Validation(format!(
                "Invalid institution type '{s}'. Must be one of: {}",
                VALID_INSTITUTION_TYPES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::School => "SCHOOL",
            Self::College => "COLLEGE",
            Self::University => "UNIVERSITY",
            Self::Coaching => "COACHING",
            Self::Edtech => "EDTECH",
            Self::Other => "OTHER",
        }
    }
}

// ---------------------------------------------------------------------------
// File handles
// ---------------------------------------------------------------------------

/// An uploaded file held in memory until submission.
///
/// Deliberately not `Serialize`: the draft store can only ever see the
/// serializable part of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileHandle {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CoreError::Validation(format!("'{}' has no usable file name", path.display()))
            })?
            .to_string();
        let mime_type = mime_for_extension(path.extension().and_then(|e| e.to_str()));
        Ok(Self::new(file_name, mime_type, bytes))
    }
}

fn mime_for_extension(ext: Option<&str>) -> &'static str {
    match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Field groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityFields {
    pub name: String,
    pub brand_name: String,
    pub institution_type: InstitutionType,
    pub ownership_type: String,
    pub tagline: String,
    pub description: String,
    pub website: String,
    pub establishment_year: Option<u16>,
}

impl IdentityFields {
    pub const FIELDS: &'static [&'static str] = &[
        "name",
        "brand_name",
        "institution_type",
        "ownership_type",
        "tagline",
        "description",
        "website",
        "establishment_year",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicFields {
    pub levels_offered: Vec<String>,
    pub streams: Vec<String>,
    pub boards_affiliations: Vec<String>,
    pub medium_of_instruction: Vec<String>,
    pub teaching_mode: String,
    pub student_count_range: String,
}

impl AcademicFields {
    pub const FIELDS: &'static [&'static str] = &[
        "levels_offered",
        "streams",
        "boards_affiliations",
        "medium_of_instruction",
        "teaching_mode",
        "student_count_range",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureFields {
    pub campus_size: String,
    pub total_classrooms: u32,
    pub total_labs: u32,
    pub has_library: bool,
    pub has_computer_lab: bool,
    pub has_science_lab: bool,
    pub has_sports_facility: bool,
    pub has_hostel: bool,
    pub has_transport: bool,
    pub has_wifi: bool,
    pub has_smart_class: bool,
    pub other_facilities: String,
}

impl InfrastructureFields {
    pub const FIELDS: &'static [&'static str] = &[
        "campus_size",
        "total_classrooms",
        "total_labs",
        "has_library",
        "has_computer_lab",
        "has_science_lab",
        "has_sports_facility",
        "has_hostel",
        "has_transport",
        "has_wifi",
        "has_smart_class",
        "other_facilities",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
    pub official_email: String,
    pub official_phone: String,
    pub google_maps_url: String,
}

/// Country pre-filled on a fresh form.
pub const DEFAULT_COUNTRY: &str = "India";

impl Default for ContactFields {
    fn default() -> Self {
        Self {
            address: String::new(),
            city: String::new(),
            state: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            pincode: String::new(),
            official_email: String::new(),
            official_phone: String::new(),
            google_maps_url: String::new(),
        }
    }
}

impl ContactFields {
    pub const FIELDS: &'static [&'static str] = &[
        "address",
        "city",
        "state",
        "country",
        "pincode",
        "official_email",
        "official_phone",
        "google_maps_url",
    ];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaFields {
    pub logo: Option<FileHandle>,
    pub cover_image: Option<FileHandle>,
}

impl MediaFields {
    pub const FIELDS: &'static [&'static str] = &["logo", "cover_image"];
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// The whole institution form.
///
/// `#[serde(default)]` at every level means a stored draft missing newer
/// fields still deserializes, with those fields taking their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionForm {
    pub identity: IdentityFields,
    pub academics: AcademicFields,
    pub infrastructure: InfrastructureFields,
    pub contact: ContactFields,
    #[serde(skip)]
    pub media: MediaFields,
}

/// A dynamically typed value for [`InstitutionForm::set_field`].
///
/// Inputs arrive as text more often than not, so the setters coerce
/// `Text` into numbers, booleans, and comma-separated lists.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Bool(bool),
    List(Vec<String>),
    File(FileHandle),
    /// Reset the field to its empty value.
    Empty,
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v)
    }
}

impl From<FileHandle> for FieldValue {
    fn from(f: FileHandle) -> Self {
        FieldValue::File(f)
    }
}

fn mismatch(field: &str, expected: &str) -> CoreError {
    CoreError::Validation(format!("Field '{field}' expects {expected}"))
}

impl FieldValue {
    fn into_text(self, field: &str) -> Result<String, CoreError> {
        match self {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Number(n) => Ok(n.to_string()),
            FieldValue::Empty => Ok(String::new()),
            _ => Err(mismatch(field, "text")),
        }
    }

    fn into_optional_number(self, field: &str) -> Result<Option<i64>, CoreError> {
        match self {
            FieldValue::Number(n) => Ok(Some(n)),
            FieldValue::Empty => Ok(None),
            FieldValue::Text(s) if s.trim().is_empty() => Ok(None),
            FieldValue::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| mismatch(field, "a whole number")),
            _ => Err(mismatch(field, "a whole number")),
        }
    }

    fn into_count(self, field: &str) -> Result<u32, CoreError> {
        let n = self.into_optional_number(field)?.unwrap_or(0);
        u32::try_from(n).map_err(|_| mismatch(field, "a non-negative number"))
    }

    fn into_bool(self, field: &str) -> Result<bool, CoreError> {
        match self {
            FieldValue::Bool(b) => Ok(b),
            FieldValue::Empty => Ok(false),
            FieldValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" | "" => Ok(false),
                _ => Err(mismatch(field, "true or false")),
            },
            _ => Err(mismatch(field, "true or false")),
        }
    }

    fn into_list(self, field: &str) -> Result<Vec<String>, CoreError> {
        match self {
            FieldValue::List(items) => Ok(items),
            FieldValue::Empty => Ok(Vec::new()),
            FieldValue::Text(s) => Ok(s
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()),
            _ => Err(mismatch(field, "a list")),
        }
    }

    fn into_file(self, field: &str) -> Result<Option<FileHandle>, CoreError> {
        match self {
            FieldValue::File(f) => Ok(Some(f)),
            FieldValue::Empty => Ok(None),
            _ => Err(mismatch(field, "a file")),
        }
    }
}

impl InstitutionForm {
    /// Set a single field by its wire name.
    ///
    /// Unknown names and values that can not be coerced to the field's type
    /// are rejected without touching the form.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), CoreError> {
        let id = &mut self.identity;
        let ac = &mut self.academics;
        let inf = &mut self.infrastructure;
        let ct = &mut self.contact;
        match name {
            // identity
            "name" => id.name = value.into_text(name)?,
            "brand_name" => id.brand_name = value.into_text(name)?,
            "institution_type" => {
                id.institution_type = InstitutionType::parse(&value.into_text(name)?)?
            }
            "ownership_type" => id.ownership_type = value.into_text(name)?,
            "tagline" => id.tagline = value.into_text(name)?,
            "description" => id.description = value.into_text(name)?,
            "website" => id.website = value.into_text(name)?,
            "establishment_year" => {
                id.establishment_year = match value.into_optional_number(name)? {
                    Some(n) => Some(u16::try_from(n).map_err(|_| mismatch(name, "a year"))?),
                    None => None,
                }
            }
            // academics
            "levels_offered" => ac.levels_offered = value.into_list(name)?,
            "streams" => ac.streams = value.into_list(name)?,
            "boards_affiliations" => ac.boards_affiliations = value.into_list(name)?,
            "medium_of_instruction" => ac.medium_of_instruction = value.into_list(name)?,
            "teaching_mode" => ac.teaching_mode = value.into_text(name)?,
            "student_count_range" => ac.student_count_range = value.into_text(name)?,
            // infrastructure
            "campus_size" => inf.campus_size = value.into_text(name)?,
            "total_classrooms" => inf.total_classrooms = value.into_count(name)?,
            "total_labs" => inf.total_labs = value.into_count(name)?,
            "has_library" => inf.has_library = value.into_bool(name)?,
            "has_computer_lab" => inf.has_computer_lab = value.into_bool(name)?,
            "has_science_lab" => inf.has_science_lab = value.into_bool(name)?,
            "has_sports_facility" => inf.has_sports_facility = value.into_bool(name)?,
            "has_hostel" => inf.has_hostel = value.into_bool(name)?,
            "has_transport" => inf.has_transport = value.into_bool(name)?,
            "has_wifi" => inf.has_wifi = value.into_bool(name)?,
            "has_smart_class" => inf.has_smart_class = value.into_bool(name)?,
            "other_facilities" => inf.other_facilities = value.into_text(name)?,
            // contact
            "address" => ct.address = value.into_text(name)?,
            "city" => ct.city = value.into_text(name)?,
            "state" => ct.state = value.into_text(name)?,
            "country" => ct.country = value.into_text(name)?,
            "pincode" => ct.pincode = value.into_text(name)?,
            "official_email" => ct.official_email = value.into_text(name)?,
            "official_phone" => ct.official_phone = value.into_text(name)?,
            "google_maps_url" => ct.google_maps_url = value.into_text(name)?,
            // media
            "logo" => self.media.logo = value.into_file(name)?,
            "cover_image" => self.media.cover_image = value.into_file(name)?,
            _ => {
                return Err(CoreError::Validation(format!(
                    "Unknown form field '{name}'"
                )))
            }
        }
        Ok(())
    }

    /// Every field name accepted by [`set_field`](Self::set_field).
    pub fn field_names() -> impl Iterator<Item = &'static str> {
        IdentityFields::FIELDS
            .iter()
            .chain(AcademicFields::FIELDS)
            .chain(InfrastructureFields::FIELDS)
            .chain(ContactFields::FIELDS)
            .chain(MediaFields::FIELDS)
            .copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn fresh_form_defaults() {
        let form = InstitutionForm::default();
        assert_eq!(form.identity.institution_type, InstitutionType::School);
        assert_eq!(form.contact.country, DEFAULT_COUNTRY);
        assert!(form.identity.name.is_empty());
        assert!(form.media.logo.is_none());
    }

    #[test]
    fn every_listed_field_is_settable() {
        for name in InstitutionForm::field_names() {
            let mut form = InstitutionForm::default();
            assert!(
                form.set_field(name, FieldValue::Empty).is_ok(),
                "field '{name}' rejected an empty value"
            );
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut form = InstitutionForm::default();
        let result = form.set_field("motto", "Lux".into());
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("motto"));
    }

    #[test]
    fn text_coerces_into_typed_fields() {
        let mut form = InstitutionForm::default();
        form.set_field("total_classrooms", "24".into()).unwrap();
        form.set_field("has_wifi", "true".into()).unwrap();
        form.set_field("streams", "Science, Commerce, ,Arts".into()).unwrap();
        form.set_field("establishment_year", "1998".into()).unwrap();
        form.set_field("institution_type", "college".into()).unwrap();

        assert_eq!(form.infrastructure.total_classrooms, 24);
        assert!(form.infrastructure.has_wifi);
        assert_eq!(form.academics.streams, vec!["Science", "Commerce", "Arts"]);
        assert_eq!(form.identity.establishment_year, Some(1998));
        assert_eq!(form.identity.institution_type, InstitutionType::College);
    }

    #[test]
    fn type_mismatch_leaves_field_untouched() {
        let mut form = InstitutionForm::default();
        form.set_field("total_labs", FieldValue::Number(3)).unwrap();
        assert!(form.set_field("total_labs", "many".into()).is_err());
        assert!(form.set_field("total_labs", FieldValue::Number(-1)).is_err());
        assert!(form.set_field("has_hostel", "maybe".into()).is_err());
        assert!(form.set_field("name", FieldValue::Bool(true)).is_err());
        assert_eq!(form.infrastructure.total_labs, 3);
    }

    #[test]
    fn file_fields_accept_only_files() {
        let mut form = InstitutionForm::default();
        let logo = FileHandle::new("logo.png", "image/png", vec![1, 2, 3]);
        form.set_field("logo", logo.clone().into()).unwrap();
        assert_eq!(form.media.logo, Some(logo));
        assert!(form.set_field("logo", "logo.png".into()).is_err());
        form.set_field("logo", FieldValue::Empty).unwrap();
        assert!(form.media.logo.is_none());
    }

    #[test]
    fn media_is_not_serialized() {
        let mut form = InstitutionForm::default();
        form.media.cover_image = Some(FileHandle::new("c.jpg", "image/jpeg", vec![0; 8]));
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("media").is_none());
        assert_eq!(json["identity"]["institution_type"], "SCHOOL");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = serde_json::json!({ "identity": { "name": "Sunrise Academy" } });
        let form: InstitutionForm = serde_json::from_value(json).unwrap();
        assert_eq!(form.identity.name, "Sunrise Academy");
        assert_eq!(form.contact.country, DEFAULT_COUNTRY);
        assert_eq!(form.infrastructure.total_classrooms, 0);
    }

    #[test]
    fn file_handle_from_path_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brochure.PDF");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let handle = FileHandle::from_path(&path).unwrap();
        assert_eq!(handle.file_name, "brochure.PDF");
        assert_eq!(handle.mime_type, "application/pdf");
        assert_eq!(handle.bytes, b"%PDF-1.4");
    }

    #[test]
    fn file_handle_from_missing_path_is_storage_error() {
        let result = FileHandle::from_path(Path::new("/definitely/not/here.png"));
        assert_matches!(result, Err(CoreError::Storage(_)));
    }
}
