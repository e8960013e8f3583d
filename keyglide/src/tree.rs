//! Identity-keyed forest of discovered elements and the hintability query.
//!
//! The hierarchy is an arena: elements and their parent/child edges are
//! stored in maps keyed by [`ElementId`], never as mutually referential
//! objects. A tree is created empty for one discovery pass, populated by the
//! traversal, queried once, then discarded.

use crate::config::DiscoveryPolicy;
use crate::element::{Element, ElementId};
use std::collections::HashMap;
use tracing::debug;

/// Forest constrained to exactly one root.
#[derive(Debug)]
pub struct ElementTree {
    elements: HashMap<ElementId, Element>,
    children: HashMap<ElementId, Vec<ElementId>>,
    root: Option<ElementId>,
    policy: DiscoveryPolicy,
}

impl ElementTree {
    pub fn new(policy: DiscoveryPolicy) -> Self {
        Self {
            elements: HashMap::new(),
            children: HashMap::new(),
            root: None,
            policy,
        }
    }

    /// Register an element under an optional parent.
    ///
    /// Fails (returns `false`, no mutation) when the identity is already
    /// present, when a non-root insertion names a parent that is not
    /// present, or when a root is inserted while one already exists.
    pub fn insert(&mut self, element: Element, parent: Option<ElementId>) -> bool {
        let id = element.id();

        if self.elements.contains_key(&id) {
            return false;
        }

        match parent {
            Some(parent_id) => {
                if !self.elements.contains_key(&parent_id) {
                    return false;
                }
                self.elements.insert(id, element);
                self.children.entry(parent_id).or_default().push(id);
            }
            None => {
                if self.root.is_some() {
                    return false;
                }
                self.root = Some(id);
                self.elements.insert(id, element);
            }
        }

        true
    }

    pub fn find(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Children of a node, in insertion order.
    ///
    /// `None` when the identity is unknown; an empty list when the node is
    /// known but childless. Callers must distinguish the two.
    pub fn children(&self, id: ElementId) -> Option<Vec<&Element>> {
        if !self.elements.contains_key(&id) {
            return None;
        }
        let ids = self.children.get(&id).map(Vec::as_slice).unwrap_or(&[]);
        Some(ids.iter().filter_map(|c| self.elements.get(c)).collect())
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.and_then(|id| self.elements.get(&id))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Collect every hintable element in one pre-order depth-first pass.
    ///
    /// The memo for the recursive hintable-descendant count lives and dies
    /// inside this call; reusing counts across calls would serve stale
    /// answers if a tree were ever queried twice around a mutation.
    pub fn query(&self) -> Vec<&Element> {
        let Some(root) = self.root else {
            return Vec::new();
        };

        let mut memo: HashMap<ElementId, usize> = HashMap::new();
        let mut results = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(element) = self.elements.get(&id) else {
                continue;
            };
            if self.is_hintable(element, &mut memo) {
                results.push(element);
            }
            if let Some(child_ids) = self.children.get(&id) {
                for &child in child_ids.iter().rev() {
                    stack.push(child);
                }
            }
        }

        debug!(
            hintable = results.len(),
            total = self.elements.len(),
            "hintability query complete"
        );
        results
    }

    /// An element deserves a hint iff its role is not an excluded container
    /// and it is either actionable or a row with no hintable descendants.
    fn is_hintable(&self, element: &Element, memo: &mut HashMap<ElementId, usize>) -> bool {
        if self
            .policy
            .excluded_container_roles
            .contains(element.role())
        {
            return false;
        }
        self.is_actionable(element) || self.is_row_without_hintable_descendants(element, memo)
    }

    /// Actionable means the action set minus the ignore-list is non-empty.
    fn is_actionable(&self, element: &Element) -> bool {
        element
            .actions()
            .iter()
            .any(|action| !self.policy.ignored_actions.contains(action))
    }

    /// Collapses an empty list row into a single hint on the row itself. A
    /// row with actionable content yields hints only for that content.
    fn is_row_without_hintable_descendants(
        &self,
        element: &Element,
        memo: &mut HashMap<ElementId, usize>,
    ) -> bool {
        element.role() == self.policy.row_role
            && self.hintable_descendant_count(element.id(), memo) == 0
    }

    /// Recursive count of hintable descendants, memoized by identity so the
    /// whole query stays linear in tree size.
    fn hintable_descendant_count(
        &self,
        id: ElementId,
        memo: &mut HashMap<ElementId, usize>,
    ) -> usize {
        if let Some(&count) = memo.get(&id) {
            return count;
        }

        let mut count = 0;
        for &child_id in self.children.get(&id).into_iter().flatten() {
            let Some(child) = self.elements.get(&child_id) else {
                continue;
            };
            count += self.hintable_descendant_count(child_id, memo)
                + usize::from(self.is_hintable(child, memo));
        }

        memo.insert(id, count);
        count
    }
}
