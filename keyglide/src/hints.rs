//! Hint label generation and anchor placement.
//!
//! Label generation follows the Vimium allocation scheme: grow candidates by
//! prepending alphabet symbols, hand out the oldest unexpanded candidates
//! first, then sort, reverse, and uppercase. Shorter labels go to earlier
//! elements, and no label is ever a prefix of another, so a partially typed
//! label is always unambiguous.

use crate::config::DiscoveryPolicy;
use crate::element::Element;
use crate::errors::{NavigationError, Result};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// One discovered element paired with its label and screen anchor.
///
/// Two hints are equal iff their element and label are equal; the anchor is
/// derived data and does not participate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hint {
    element: Element,
    label: String,
    anchor: Point,
}

impl Hint {
    pub fn new(element: Element, label: String, anchor: Point) -> Self {
        Self {
            element,
            label,
            anchor,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }
}

impl PartialEq for Hint {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element && self.label == other.label
    }
}

impl Eq for Hint {}

impl Hash for Hint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
        self.label.hash(state);
    }
}

/// Generate `count` unique labels from `alphabet`.
///
/// Candidates start from one empty seed. The oldest unexpanded candidate is
/// expanded by prepending every alphabet symbol; the first expansion always
/// happens so at least the length-1 labels exist. Once enough unconsumed
/// candidates exist, exactly `count` of them are taken from the consumption
/// point, sorted, then each is reversed and uppercased.
///
/// Errs only on an empty alphabet. A count of zero yields an empty list.
pub fn generate_labels(count: usize, alphabet: &[char]) -> Result<Vec<String>> {
    if alphabet.is_empty() {
        return Err(NavigationError::InvalidArgument(
            "hint alphabet must not be empty".to_string(),
        ));
    }
    if count == 0 {
        return Ok(Vec::new());
    }
    // With one symbol, every longer label has the shorter one as a prefix,
    // so only a single label can ever be handed out.
    if alphabet.len() == 1 && count > 1 {
        return Err(NavigationError::InvalidArgument(
            "a single-symbol alphabet cannot produce multiple prefix-free labels".to_string(),
        ));
    }

    let mut candidates: Vec<String> = vec![String::new()];
    let mut offset = 0;

    while candidates.len() - offset < count || candidates.len() == 1 {
        let stem = candidates[offset].clone();
        offset += 1;

        for &symbol in alphabet {
            let mut candidate = String::with_capacity(stem.len() + 1);
            candidate.push(symbol);
            candidate.push_str(&stem);
            candidates.push(candidate);
        }
    }

    let mut labels: Vec<String> = candidates[offset..offset + count].to_vec();
    labels.sort();
    Ok(labels
        .into_iter()
        .map(|label| label.chars().rev().collect::<String>().to_uppercase())
        .collect())
}

/// Compute the anchor point for one element.
///
/// Link-like roles anchor at the bottom-left corner of the visible frame,
/// inset so the label stays within the element; a centered label there would
/// cover the surrounding inline text. Everything else anchors at the center.
/// Placement never fails.
pub fn anchor(element: &Element, policy: &DiscoveryPolicy) -> Point {
    let frame = element.visible_frame();
    if policy.link_roles.contains(element.role()) {
        frame.corner(false, false, policy.hint_corner_inset)
    } else {
        frame.center()
    }
}

/// Pair every element with a generated label and computed anchor.
pub fn assemble(
    elements: &[&Element],
    alphabet: &[char],
    policy: &DiscoveryPolicy,
) -> Result<Vec<Hint>> {
    let labels = generate_labels(elements.len(), alphabet)?;
    Ok(elements
        .iter()
        .zip(labels)
        .map(|(&element, label)| {
            let anchor = anchor(element, policy);
            Hint::new(element.clone(), label, anchor)
        })
        .collect())
}
