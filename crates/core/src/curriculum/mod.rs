//! Course curriculum: sections, lessons, and the editing operations the
//! course builder performs on them.
//!
//! Section and lesson `order` values are always `0..n` with no gaps. Every
//! mutating operation on [`Curriculum`] renumbers what it touched.

pub mod reorder;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::ServerId;

pub use reorder::{reorder, ContainerId, DragLocation, DropResult};

/// Prefix of client-generated identifiers.
pub const TEMP_ID_PREFIX: &str = "temp-";

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a section or lesson.
///
/// Items created in the builder carry a `Temp` id until the server answers
/// with the real one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemId {
    Persisted(ServerId),
    Temp(String),
}

impl ItemId {
    pub fn new_temp() -> Self {
        ItemId::Temp(format!("{TEMP_ID_PREFIX}{}", Uuid::new_v4()))
    }

    /// Parse either a server UUID or a `temp-` identifier.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(ItemId::Persisted(id));
        }
        if s.len() > TEMP_ID_PREFIX.len() && s.starts_with(TEMP_ID_PREFIX) {
            return Ok(ItemId::Temp(s.to_string()));
        }
        Err(CoreError::Validation(format!(
            "Invalid item id '{s}'. Expected a UUID or a '{TEMP_ID_PREFIX}' identifier"
        )))
    }

    pub fn as_persisted(&self) -> Option<ServerId> {
        match self {
            ItemId::Persisted(id) => Some(*id),
            ItemId::Temp(_) => None,
        }
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, ItemId::Temp(_))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Persisted(id) => write!(f, "{id}"),
            ItemId::Temp(s) => f.write_str(s),
        }
    }
}

impl Serialize for ItemId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ItemId::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl From<ServerId> for ItemId {
    fn from(id: ServerId) -> Self {
        ItemId::Persisted(id)
    }
}

// ---------------------------------------------------------------------------
// Sections and lessons
// ---------------------------------------------------------------------------

/// Lesson content. Documents travel as `PDF`, the backend's name for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    #[serde(rename = "VIDEO")]
    Video,
    #[serde(rename = "PDF", alias = "DOCUMENT")]
    Document,
}

impl ContentType {
    /// Wire name, as accepted by the lesson endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "VIDEO",
            Self::Document => "PDF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: ItemId,
    /// The owning section.
    pub section_id: ItemId,
    pub title: String,
    pub order: u32,
    pub content_type: ContentType,
    pub duration_minutes: u32,
    pub is_preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: ItemId,
    pub title: String,
    pub order: u32,
    pub lessons: Vec<Lesson>,
}

impl Section {
    pub fn total_duration_minutes(&self) -> u32 {
        self.lessons
            .iter()
            .fold(0u32, |total, l| total.saturating_add(l.duration_minutes))
    }
}

/// Fields for a lesson about to be added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewLesson {
    pub title: String,
    pub content_type: ContentType,
    pub duration_minutes: u32,
    pub is_preview: bool,
}

/// Renumber lessons `0..n` in list order.
pub(crate) fn renumber_lessons(section: &mut Section) {
    for (i, lesson) in section.lessons.iter_mut().enumerate() {
        lesson.order = i as u32;
    }
}

/// Renumber sections `0..n` in list order.
pub(crate) fn renumber_sections(sections: &mut [Section]) {
    for (i, section) in sections.iter_mut().enumerate() {
        section.order = i as u32;
    }
}

// ---------------------------------------------------------------------------
// Curriculum
// ---------------------------------------------------------------------------

/// The ordered sections of one course, as edited in the builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Curriculum {
    sections: Vec<Section>,
}

impl Curriculum {
    /// Build from sections as loaded from the server.
    ///
    /// Sections and lessons are sorted by their stored `order`, then
    /// renumbered so gaps left by server-side deletes disappear. Lesson
    /// owner references are rewritten to match their containing section.
    pub fn from_sections(mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|s| s.order);
        renumber_sections(&mut sections);
        for section in &mut sections {
            section.lessons.sort_by_key(|l| l.order);
            for lesson in &mut section.lessons {
                lesson.section_id = section.id.clone();
            }
            renumber_lessons(section);
        }
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &ItemId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    fn section_mut(&mut self, id: &ItemId) -> Result<&mut Section, CoreError> {
        self.sections
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "section",
                id: id.to_string(),
            })
    }

    /// Append a new section with a temporary id.
    pub fn add_section(&mut self, title: impl Into<String>) -> ItemId {
        let id = ItemId::new_temp();
        self.sections.push(Section {
            id: id.clone(),
            title: title.into(),
            order: self.sections.len() as u32,
            lessons: Vec::new(),
        });
        id
    }

    /// Append a lesson with a temporary id to `section_id`.
    pub fn add_lesson(&mut self, section_id: &ItemId, new: NewLesson) -> Result<ItemId, CoreError> {
        let section = self.section_mut(section_id)?;
        let id = ItemId::new_temp();
        section.lessons.push(Lesson {
            id: id.clone(),
            section_id: section.id.clone(),
            title: new.title,
            order: section.lessons.len() as u32,
            content_type: new.content_type,
            duration_minutes: new.duration_minutes,
            is_preview: new.is_preview,
        });
        Ok(id)
    }

    pub fn remove_section(&mut self, id: &ItemId) -> Result<Section, CoreError> {
        let index = self
            .sections
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "section",
                id: id.to_string(),
            })?;
        let removed = self.sections.remove(index);
        renumber_sections(&mut self.sections);
        Ok(removed)
    }

    pub fn remove_lesson(&mut self, id: &ItemId) -> Result<Lesson, CoreError> {
        for section in &mut self.sections {
            if let Some(index) = section.lessons.iter().position(|l| &l.id == id) {
                let removed = section.lessons.remove(index);
                renumber_lessons(section);
                return Ok(removed);
            }
        }
        Err(CoreError::NotFound {
            entity: "lesson",
            id: id.to_string(),
        })
    }

    /// Replace a section's temporary id with the one the server issued.
    /// Lessons owned by the section follow.
    pub fn assign_section_id(&mut self, temp: &ItemId, server: ServerId) -> Result<(), CoreError> {
        let new_id = ItemId::Persisted(server);
        if self.section(&new_id).is_some() {
            return Err(CoreError::Conflict(format!(
                "Section id {server} is already in use"
            )));
        }
        let section = self.section_mut(temp)?;
        section.id = new_id.clone();
        for lesson in &mut section.lessons {
            lesson.section_id = new_id.clone();
        }
        Ok(())
    }

    /// Replace a lesson's temporary id with the one the server issued.
    pub fn assign_lesson_id(&mut self, temp: &ItemId, server: ServerId) -> Result<(), CoreError> {
        let lesson = self
            .sections
            .iter_mut()
            .flat_map(|s| s.lessons.iter_mut())
            .find(|l| &l.id == temp)
            .ok_or_else(|| CoreError::NotFound {
                entity: "lesson",
                id: temp.to_string(),
            })?;
        lesson.id = ItemId::Persisted(server);
        Ok(())
    }

    /// Apply a finished drag gesture. On error nothing changes.
    pub fn apply_drop(&mut self, drop: &DropResult) -> Result<(), CoreError> {
        self.sections = reorder(&self.sections, drop)?;
        Ok(())
    }

    /// Section ids in display order, for the section reorder endpoint.
    /// Unsaved sections are skipped.
    pub fn section_order(&self) -> Vec<ServerId> {
        self.sections
            .iter()
            .filter_map(|s| s.id.as_persisted())
            .collect()
    }

    /// Lesson ids of one section in display order, for the lesson reorder
    /// endpoint. Unsaved lessons are skipped.
    pub fn lesson_order(&self, section_id: &ItemId) -> Result<Vec<ServerId>, CoreError> {
        let section = self.section(section_id).ok_or_else(|| CoreError::NotFound {
            entity: "section",
            id: section_id.to_string(),
        })?;
        Ok(section
            .lessons
            .iter()
            .filter_map(|l| l.id.as_persisted())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
