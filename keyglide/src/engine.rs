//! The element-query collaborator seam.

use crate::element::ElementId;
use crate::geometry::Rect;

/// Transport-agnostic access to the host's UI element hierarchy.
///
/// Implementations typically wrap a cross-process accessibility transport and
/// may block on every call, which is why [`discover`](crate::traversal::discover)
/// is always run on a blocking thread rather than the thread that handles
/// live key events.
///
/// Every accessor returns `None` on failure. Discovery treats a failed fetch
/// as "no value" (no children, no actions) and keeps going; a single
/// unreadable subtree never aborts a traversal.
pub trait QueryEngine: Send + Sync {
    /// Role tag of the element ("window", "button", "row", ...).
    fn role(&self, id: ElementId) -> Option<String>;

    /// Bounding frame of the element in the discovery coordinate space.
    fn frame(&self, id: ElementId) -> Option<Rect>;

    /// Names of the actions the element supports.
    fn action_names(&self, id: ElementId) -> Option<Vec<String>>;

    /// Direct children, in presentation order.
    fn children(&self, id: ElementId) -> Option<Vec<ElementId>>;

    /// Only the currently visible rows of a table/outline-like container.
    ///
    /// Used instead of [`children`](Self::children) for such containers so
    /// that off-screen rows are never materialized.
    fn visible_rows(&self, _id: ElementId) -> Option<Vec<ElementId>> {
        None
    }

    /// Whether the element advertises the bulk interactive-descendant query.
    fn supports_interactive_descendants(&self, _id: ElementId) -> bool {
        false
    }

    /// Bulk query returning every interactive descendant of the element.
    ///
    /// For large document-like containers this is dramatically cheaper than
    /// naive recursive descent; the traversal prefers it whenever
    /// [`supports_interactive_descendants`](Self::supports_interactive_descendants)
    /// reports the capability.
    fn interactive_descendants(&self, _id: ElementId) -> Option<Vec<ElementId>> {
        None
    }
}
