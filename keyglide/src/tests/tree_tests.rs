//! Tests for the element tree invariants and hintability classification.

use crate::config::DiscoveryPolicy;
use crate::element::{Element, ElementId};
use crate::geometry::Rect;
use crate::tree::ElementTree;

fn id(raw: u64) -> ElementId {
    ElementId::new(raw)
}

fn element(raw: u64, role: &str, actions: &[&str]) -> Element {
    Element::new(
        id(raw),
        role,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        actions.iter().map(|a| a.to_string()).collect(),
    )
}

fn tree() -> ElementTree {
    ElementTree::new(DiscoveryPolicy::default())
}

#[test]
fn duplicate_identity_insertion_fails_without_mutation() {
    let mut tree = tree();
    assert!(tree.insert(element(1, "window", &[]), None));
    assert!(tree.insert(element(2, "button", &["press"]), Some(id(1))));

    // Same identity again, under a different parent.
    assert!(!tree.insert(element(2, "button", &["press"]), Some(id(1))));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.children(id(1)).unwrap().len(), 1);
}

#[test]
fn orphan_insertion_fails() {
    let mut tree = tree();
    assert!(tree.insert(element(1, "window", &[]), None));
    assert!(!tree.insert(element(2, "button", &["press"]), Some(id(99))));
    assert_eq!(tree.len(), 1);
}

#[test]
fn second_root_insertion_fails() {
    let mut tree = tree();
    assert!(tree.insert(element(1, "window", &[]), None));
    assert!(!tree.insert(element(2, "window", &[]), None));
    assert_eq!(tree.root().unwrap().id(), id(1));
}

#[test]
fn unknown_node_and_childless_node_are_distinguishable() {
    let mut tree = tree();
    tree.insert(element(1, "window", &[]), None);

    assert!(tree.children(id(99)).is_none());
    assert_eq!(tree.children(id(1)).unwrap().len(), 0);
    assert!(tree.find(id(99)).is_none());
    assert!(tree.find(id(1)).is_some());
}

#[test]
fn actionable_elements_are_hintable() {
    let mut tree = tree();
    tree.insert(element(1, "window", &[]), None);
    tree.insert(element(2, "button", &["press"]), Some(id(1)));
    tree.insert(element(3, "text", &[]), Some(id(1)));

    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![2]);
}

#[test]
fn excluded_containers_are_never_hintable() {
    let mut tree = tree();
    // Even with a real action, window-level containers get no hint.
    tree.insert(element(1, "window", &["raise"]), None);
    tree.insert(element(2, "scroll-area", &["press"]), Some(id(1)));
    tree.insert(element(3, "button", &["press"]), Some(id(2)));

    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![3]);
}

#[test]
fn ignored_actions_do_not_make_an_element_actionable() {
    let mut tree = tree();
    tree.insert(element(1, "window", &[]), None);
    tree.insert(
        element(2, "group", &["show-menu", "scroll-to-visible"]),
        Some(id(1)),
    );
    tree.insert(element(3, "group", &["show-menu", "press"]), Some(id(1)));

    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![3]);
}

#[test]
fn row_with_no_hintable_descendants_collapses_to_one_hint() {
    let mut tree = tree();
    tree.insert(element(1, "window", &[]), None);
    tree.insert(element(2, "row", &["scroll-to-visible"]), Some(id(1)));
    // Plain static content inside the row: not hintable on its own.
    tree.insert(element(3, "text", &[]), Some(id(2)));

    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![2]);
}

#[test]
fn row_with_actionable_descendant_yields_only_the_descendant() {
    let mut tree = tree();
    tree.insert(element(1, "window", &[]), None);
    tree.insert(element(2, "row", &[]), Some(id(1)));
    tree.insert(element(3, "button", &["press"]), Some(id(2)));

    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![3]);
}

#[test]
fn nested_empty_rows_hint_only_the_innermost() {
    let mut tree = tree();
    tree.insert(element(1, "window", &[]), None);
    tree.insert(element(2, "row", &[]), Some(id(1)));
    tree.insert(element(3, "row", &[]), Some(id(2)));

    // The inner row is a childless interactive row, which makes it a
    // hintable descendant of the outer row.
    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![3]);
}

#[test]
fn query_results_are_in_preorder() {
    let mut tree = tree();
    tree.insert(element(1, "window", &[]), None);
    tree.insert(element(2, "group", &["press"]), Some(id(1)));
    tree.insert(element(4, "button", &["press"]), Some(id(2)));
    tree.insert(element(3, "button", &["press"]), Some(id(1)));

    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![2, 4, 3]);
}

#[test]
fn descendant_counts_are_not_reused_across_queries() {
    let mut tree = tree();
    tree.insert(element(1, "window", &[]), None);
    tree.insert(element(2, "row", &[]), Some(id(1)));

    // First query: the row is empty, so it gets the collapsed hint.
    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![2]);

    // A hintable child appears. A stale descendant count would keep
    // hinting the row itself.
    tree.insert(element(3, "button", &["press"]), Some(id(2)));
    let hintable: Vec<u64> = tree.query().iter().map(|e| e.id().raw()).collect();
    assert_eq!(hintable, vec![3]);
}

#[test]
fn query_on_empty_tree_is_empty() {
    let tree = tree();
    assert!(tree.query().is_empty());
    assert!(tree.is_empty());
}
