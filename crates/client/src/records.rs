//! Wire shapes of the course-management endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use eduhire_core::curriculum::{ContentType, ItemId, Lesson, Section};
use eduhire_core::optimistic::FollowState;

/// A lesson as returned inside a section listing.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub is_preview: bool,
}

/// A section with its nested lessons.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub lessons: Vec<LessonRecord>,
}

impl SectionRecord {
    pub fn into_section(self) -> Section {
        let section_id = ItemId::Persisted(self.id);
        let lessons = self
            .lessons
            .into_iter()
            .map(|l| Lesson {
                id: ItemId::Persisted(l.id),
                section_id: section_id.clone(),
                title: l.title,
                order: l.order,
                content_type: content_type_from_wire(&l.content_type),
                duration_minutes: l.duration_minutes,
                is_preview: l.is_preview,
            })
            .collect();
        Section {
            id: section_id,
            title: self.title,
            order: self.order,
            lessons,
        }
    }
}

/// Everything that is not a video plays as a document in the builder.
fn content_type_from_wire(s: &str) -> ContentType {
    if s.is_empty() || s.eq_ignore_ascii_case("VIDEO") {
        ContentType::Video
    } else {
        ContentType::Document
    }
}

/// Response of the section and lesson create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedItem {
    pub id: Uuid,
    pub title: String,
    pub order: u32,
}

/// Body of the section and lesson reorder endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct OrderRequest<'a> {
    pub order: &'a [Uuid],
}

/// Body of the institution create endpoint.
///
/// The backend echoes the submitted fields; `id` and `slug` may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatedInstitutionRecord {
    pub id: Option<Uuid>,
    pub slug: Option<String>,
    pub name: Option<String>,
}

/// The parts of the institution detail view the follow toggle needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstitutionRecord {
    pub slug: String,
    pub name: String,
    pub is_following: bool,
    pub follower_count: u64,
}

impl InstitutionRecord {
    pub fn follow_state(&self) -> FollowState {
        FollowState {
            is_following: self.is_following,
            follower_count: self.follower_count,
        }
    }
}

/// Body of the lesson partial update that moves a lesson to another
/// section.
#[derive(Debug, Serialize)]
pub(crate) struct LessonSectionUpdate {
    pub section: Uuid,
}

/// Response of the follow toggle endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowResponse {
    pub is_following: bool,
    pub follower_count: u64,
    #[serde(default)]
    pub message: String,
}

impl From<FollowResponse> for FollowState {
    fn from(r: FollowResponse) -> Self {
        FollowState {
            is_following: r.is_following,
            follower_count: r.follower_count,
        }
    }
}
