//! Element snapshots taken at discovery time.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque identity for a UI element, minted by the query engine.
///
/// Identities are stable for the duration of one discovery pass and are never
/// reused within it. They are the sole key for every element-keyed relation
/// in the crate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementId(u64);

impl ElementId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A snapshot of one UI element at the moment of discovery.
///
/// Immutable after insertion into an [`ElementTree`](crate::tree::ElementTree),
/// except for the clipped frame which the traversal records exactly once.
/// Equality and hashing are by identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    role: String,
    frame: Rect,
    actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    clipped_frame: Option<Rect>,
}

impl Element {
    pub fn new(
        id: ElementId,
        role: impl Into<String>,
        frame: Rect,
        actions: Vec<String>,
    ) -> Self {
        Self {
            id,
            role: role.into(),
            frame,
            actions,
            clipped_frame: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Action names supported by the element, as reported by the query engine.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// The frame intersected with every ancestor clip, recorded during
    /// traversal. `None` when the element was discovered unclipped.
    pub fn clipped_frame(&self) -> Option<Rect> {
        self.clipped_frame
    }

    pub(crate) fn set_clipped_frame(&mut self, frame: Rect) {
        self.clipped_frame = Some(frame);
    }

    /// The clipped frame when one was recorded, the full frame otherwise.
    /// Anchor placement works on this.
    pub fn visible_frame(&self) -> Rect {
        self.clipped_frame.unwrap_or(self.frame)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Element({} role={} actions={})",
            self.id,
            self.role,
            self.actions.len()
        )
    }
}
