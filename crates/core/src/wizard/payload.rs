//! Flattening of the institution form into multipart parts.
//!
//! Encoding rules: arrays are JSON-encoded, booleans become `"true"` /
//! `"false"`, numbers are decimal, unset optionals are omitted, files are
//! binary parts under their field name.

use super::form::{FileHandle, InstitutionForm};

/// Ordered text and file parts ready for a multipart body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionPayload {
    pub text_parts: Vec<(String, String)>,
    pub file_parts: Vec<(String, FileHandle)>,
}

impl SubmissionPayload {
    pub fn from_form(form: &InstitutionForm) -> Self {
        let mut p = PayloadBuilder::default();

        let id = &form.identity;
        p.text("name", id.name.trim());
        p.text("brand_name", &id.brand_name);
        p.text("institution_type", id.institution_type.as_str());
        p.text("ownership_type", &id.ownership_type);
        p.text("tagline", &id.tagline);
        p.text("description", &id.description);
        p.text("website", &id.website);
        if let Some(year) = id.establishment_year {
            p.text("establishment_year", &year.to_string());
        }

        let ac = &form.academics;
        p.list("levels_offered", &ac.levels_offered);
        p.list("streams", &ac.streams);
        p.list("boards_affiliations", &ac.boards_affiliations);
        p.list("medium_of_instruction", &ac.medium_of_instruction);
        p.text("teaching_mode", &ac.teaching_mode);
        p.text("student_count_range", &ac.student_count_range);

        let inf = &form.infrastructure;
        p.text("campus_size", &inf.campus_size);
        p.text("total_classrooms", &inf.total_classrooms.to_string());
        p.text("total_labs", &inf.total_labs.to_string());
        p.flag("has_library", inf.has_library);
        p.flag("has_computer_lab", inf.has_computer_lab);
        p.flag("has_science_lab", inf.has_science_lab);
        p.flag("has_sports_facility", inf.has_sports_facility);
        p.flag("has_hostel", inf.has_hostel);
        p.flag("has_transport", inf.has_transport);
        p.flag("has_wifi", inf.has_wifi);
        p.flag("has_smart_class", inf.has_smart_class);
        p.text("other_facilities", &inf.other_facilities);

        let ct = &form.contact;
        p.text("address", &ct.address);
        p.text("city", ct.city.trim());
        p.text("state", &ct.state);
        p.text("country", &ct.country);
        p.text("pincode", ct.pincode.trim());
        p.text("official_email", ct.official_email.trim());
        p.text("official_phone", &ct.official_phone);
        p.text("google_maps_url", ct.google_maps_url.trim());

        if let Some(logo) = &form.media.logo {
            p.file("logo", logo);
        }
        if let Some(cover) = &form.media.cover_image {
            p.file("cover_image", cover);
        }

        p.finish()
    }

    /// Look up a text part by field name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text_parts
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct PayloadBuilder {
    payload: SubmissionPayload,
}

impl PayloadBuilder {
    fn text(&mut self, name: &str, value: &str) {
        self.payload
            .text_parts
            .push((name.to_string(), value.to_string()));
    }

    fn flag(&mut self, name: &str, value: bool) {
        self.text(name, if value { "true" } else { "false" });
    }

    fn list(&mut self, name: &str, items: &[String]) {
        // Serializing a slice of strings can not fail.
        let encoded = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
        self.text(name, &encoded);
    }

    fn file(&mut self, name: &str, handle: &FileHandle) {
        self.payload
            .file_parts
            .push((name.to_string(), handle.clone()));
    }

    fn finish(self) -> SubmissionPayload {
        self.payload
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
