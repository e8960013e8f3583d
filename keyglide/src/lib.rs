//! Keyboard-driven UI navigation engines over desktop accessibility trees
//!
//! This crate provides the two engines behind a hint-based navigator: one
//! discovers which elements of a UI hierarchy deserve a keyboard hint and
//! assigns each a short unique label with a screen anchor; the other watches
//! a live, unfiltered key event stream for configured trigger sequences
//! while guaranteeing zero-latency pass-through for ordinary typing.
//!
//! Rendering, pointer synthesis, permission prompts, and the accessibility
//! transport itself stay with the host, behind the [`QueryEngine`],
//! [`InputTap`], and [`HintSink`] seams.
//!
//! ```no_run
//! use keyglide::{discover, ElementId, NavConfig};
//! # fn demo(engine: &dyn keyglide::QueryEngine) -> Result<(), keyglide::NavigationError> {
//! let config = NavConfig::default();
//! let tree = discover(engine, ElementId::new(1), &config.discovery)?;
//! let hints = keyglide::assemble(&tree.query(), &config.alphabet(), &config.discovery)?;
//! println!("{} hintable elements", hints.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod element;
pub mod engine;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod hints;
pub mod listener;
pub mod matcher;
pub mod session;
pub mod traversal;
pub mod tree;
pub mod trie;

#[cfg(test)]
mod tests;

pub use config::{DiscoveryPolicy, NavConfig, TriggerConfig};
pub use element::{Element, ElementId};
pub use engine::QueryEngine;
pub use errors::{NavigationError, Result};
pub use events::{EventDisposition, KeyEvent, BASELINE_MODIFIER_MASK};
pub use geometry::{Point, Rect};
pub use hints::{assemble, generate_labels, Hint};
pub use listener::{InputTap, TriggerListener};
pub use matcher::{MatcherState, SequenceMatcher};
pub use session::{HintSession, HintSink, ModeCoordinator, SelectionProgress, SessionId};
pub use traversal::discover;
pub use tree::ElementTree;
pub use trie::Trie;
