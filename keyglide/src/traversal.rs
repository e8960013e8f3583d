//! Depth-first discovery of a window's element hierarchy.

use crate::config::DiscoveryPolicy;
use crate::element::{Element, ElementId};
use crate::engine::QueryEngine;
use crate::errors::{NavigationError, Result};
use crate::geometry::Rect;
use crate::tree::ElementTree;
use tracing::{debug, instrument};

/// Running counters for one traversal, logged when it completes.
#[derive(Debug, Default)]
struct TraversalStats {
    elements_inserted: usize,
    clipped_out: usize,
    query_failures: usize,
    max_depth: usize,
}

/// Populate an [`ElementTree`] from `root` by depth-first walk.
///
/// Each recursive step carries the intersection of every ancestor clip
/// rectangle; a child whose frame does not touch it is skipped entirely,
/// children unvisited. The element's own clipped frame is recorded before
/// insertion and drives anchor placement later.
///
/// Query failures degrade to absence — an unreadable subtree is dropped, the
/// walk continues. The only error is a root whose role or frame cannot be
/// read at all, because then there is nothing to discover.
#[instrument(skip(engine, policy))]
pub fn discover(
    engine: &dyn QueryEngine,
    root: ElementId,
    policy: &DiscoveryPolicy,
) -> Result<ElementTree> {
    let mut tree = ElementTree::new(policy.clone());
    let mut stats = TraversalStats::default();

    let Some(root_element) = materialize(engine, root, &mut stats) else {
        return Err(NavigationError::ElementNotFound(format!(
            "root element {root} has no readable role or frame"
        )));
    };

    walk(engine, &mut tree, root_element, None, None, 0, policy, &mut stats);

    debug!(
        inserted = stats.elements_inserted,
        clipped_out = stats.clipped_out,
        query_failures = stats.query_failures,
        max_depth = stats.max_depth,
        "discovery traversal complete"
    );
    Ok(tree)
}

/// Snapshot one element through the query engine. Role and frame are
/// required to place and classify it; actions degrade to empty.
fn materialize(
    engine: &dyn QueryEngine,
    id: ElementId,
    stats: &mut TraversalStats,
) -> Option<Element> {
    let (Some(role), Some(frame)) = (engine.role(id), engine.frame(id)) else {
        stats.query_failures += 1;
        return None;
    };
    let actions = engine.action_names(id).unwrap_or_default();
    Some(Element::new(id, role, frame, actions))
}

#[allow(clippy::too_many_arguments)]
fn walk(
    engine: &dyn QueryEngine,
    tree: &mut ElementTree,
    mut element: Element,
    parent: Option<ElementId>,
    clip: Option<Rect>,
    depth: usize,
    policy: &DiscoveryPolicy,
    stats: &mut TraversalStats,
) {
    if let Some(clip) = &clip {
        if !clip.intersects(&element.frame()) {
            stats.clipped_out += 1;
            return;
        }
    }

    let clipped = match clip {
        Some(clip) => clip.intersection(&element.frame()),
        None => element.frame(),
    };
    element.set_clipped_frame(clipped);

    let id = element.id();
    let role = element.role().to_string();

    if !tree.insert(element, parent) {
        // Duplicate identity or structural violation; drop the subtree.
        return;
    }
    stats.elements_inserted += 1;
    stats.max_depth = stats.max_depth.max(depth);

    for child_id in fetch_child_ids(engine, id, &role, policy) {
        if let Some(child) = materialize(engine, child_id, stats) {
            walk(
                engine,
                tree,
                child,
                Some(id),
                Some(clipped),
                depth + 1,
                policy,
                stats,
            );
        }
    }
}

/// Children-fetch strategy, in priority order:
///
/// 1. table/outline-like containers expose only their visible rows, so
///    off-screen rows are never materialized;
/// 2. containers advertising the bulk interactive-descendant query hand back
///    their interesting content in one call instead of an exponentially
///    slower recursive descent;
/// 3. everything else uses the plain children attribute.
fn fetch_child_ids(
    engine: &dyn QueryEngine,
    id: ElementId,
    role: &str,
    policy: &DiscoveryPolicy,
) -> Vec<ElementId> {
    if policy.table_roles.contains(role) {
        if let Some(rows) = engine.visible_rows(id) {
            return rows;
        }
    }

    if engine.supports_interactive_descendants(id) {
        if let Some(found) = engine.interactive_descendants(id) {
            return found;
        }
    }

    engine.children(id).unwrap_or_default()
}
