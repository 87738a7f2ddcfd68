//! Drag-and-drop reorder engine for the curriculum builder.
//!
//! A drop names a source and a destination container plus indices. The
//! container is either the top-level section list (`"sections"`) or one
//! section's lesson list (`"section-<id>"`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

use super::{renumber_lessons, renumber_sections, ItemId, Section};

/// Droppable id of the top-level section list.
pub const SECTIONS_CONTAINER: &str = "sections";

/// Prefix of a section's lesson list droppable id.
pub const SECTION_CONTAINER_PREFIX: &str = "section-";

// ---------------------------------------------------------------------------
// Drop description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerId {
    /// The list of sections itself.
    Sections,
    /// The lesson list of one section.
    Section(ItemId),
}

impl ContainerId {
    /// Parse a droppable id as produced by the builder UI.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s == SECTIONS_CONTAINER {
            return Ok(ContainerId::Sections);
        }
        match s.strip_prefix(SECTION_CONTAINER_PREFIX) {
            Some(rest) => Ok(ContainerId::Section(ItemId::parse(rest)?)),
            None => Err(CoreError::Validation(format!(
                "Unknown drop container '{s}'"
            ))),
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Sections => f.write_str(SECTIONS_CONTAINER),
            ContainerId::Section(id) => write!(f, "{SECTION_CONTAINER_PREFIX}{id}"),
        }
    }
}

impl Serialize for ContainerId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContainerId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContainerId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// One end of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    #[serde(rename = "droppableId")]
    pub container: ContainerId,
    pub index: usize,
}

impl DragLocation {
    pub fn new(container: ContainerId, index: usize) -> Self {
        Self { container, index }
    }
}

/// A finished drag gesture. `destination` is `None` when the drop was
/// cancelled or landed outside any container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropResult {
    pub source: DragLocation,
    pub destination: Option<DragLocation>,
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

/// Compute the sections after a drop.
///
/// The input is never modified. Every item present before is present after
/// exactly once; only positions (and, for cross-section moves, the lesson's
/// owner) change. A destination index equal to the list length appends.
pub fn reorder(sections: &[Section], drop: &DropResult) -> Result<Vec<Section>, CoreError> {
    let mut next = sections.to_vec();
    let Some(dest) = &drop.destination else {
        return Ok(next);
    };
    let (from, to) = (drop.source.index, dest.index);

    match (&drop.source.container, &dest.container) {
        (ContainerId::Sections, ContainerId::Sections) => {
            move_within(&mut next, from, to)?;
            renumber_sections(&mut next);
        }
        (ContainerId::Section(src), ContainerId::Section(dst)) if src == dst => {
            let i = position(&next, src)?;
            move_within(&mut next[i].lessons, from, to)?;
            renumber_lessons(&mut next[i]);
        }
        (ContainerId::Section(src), ContainerId::Section(dst)) => {
            let si = position(&next, src)?;
            let di = position(&next, dst)?;
            check_index(from, next[si].lessons.len(), "source")?;
            check_index(to, next[di].lessons.len() + 1, "destination")?;

            let mut lesson = next[si].lessons.remove(from);
            lesson.section_id = next[di].id.clone();
            tracing::debug!(lesson = %lesson.id, from = %src, to = %dst, "Moving lesson across sections");
            next[di].lessons.insert(to, lesson);
            renumber_lessons(&mut next[si]);
            renumber_lessons(&mut next[di]);
        }
        _ => {
            return Err(CoreError::Validation(
                "Sections and lessons can not be dropped into each other's lists".to_string(),
            ))
        }
    }

    Ok(next)
}

/// Remove at `from` and reinsert at `to` within one list.
fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), CoreError> {
    check_index(from, items.len(), "source")?;
    check_index(to, items.len() + 1, "destination")?;
    let item = items.remove(from);
    // `to == len` before removal means "append".
    let to = to.min(items.len());
    items.insert(to, item);
    Ok(())
}

fn check_index(index: usize, bound: usize, which: &str) -> Result<(), CoreError> {
    if index < bound {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Drop {which} index {index} is out of range (must be < {bound})"
        )))
    }
}

fn position(sections: &[Section], id: &ItemId) -> Result<usize, CoreError> {
    sections
        .iter()
        .position(|s| &s.id == id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "section",
            id: id.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
