//! Configuration for both engines.
//!
//! Everything here is read-only to the engines: the host loads or edits a
//! [`NavConfig`], validates it once, and hands it over.

use crate::errors::{NavigationError, Result};
use crate::events::BASELINE_MODIFIER_MASK;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

static DEFAULT_EXCLUDED_CONTAINER_ROLES: Lazy<HashSet<String>> = Lazy::new(|| {
    ["window", "scroll-area"]
        .into_iter()
        .map(String::from)
        .collect()
});

// Actions that exist on nearly every element but mean nothing to a user
// selecting a target, so they never make an element hintable on their own.
static DEFAULT_IGNORED_ACTIONS: Lazy<HashSet<String>> = Lazy::new(|| {
    [
        "show-menu",
        "scroll-to-visible",
        "show-default-ui",
        "show-alternate-ui",
    ]
    .into_iter()
    .map(String::from)
    .collect()
});

static DEFAULT_TABLE_ROLES: Lazy<HashSet<String>> =
    Lazy::new(|| ["table", "outline"].into_iter().map(String::from).collect());

static DEFAULT_LINK_ROLES: Lazy<HashSet<String>> =
    Lazy::new(|| ["link"].into_iter().map(String::from).collect());

/// Role and action policy applied during discovery, hintability
/// classification, and anchor placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryPolicy {
    /// Container roles that are never hintable themselves (their contents
    /// still are).
    pub excluded_container_roles: HashSet<String>,

    /// Action names that do not count toward actionability.
    pub ignored_actions: HashSet<String>,

    /// Roles whose children are fetched through the visible-rows query
    /// instead of the plain children attribute.
    pub table_roles: HashSet<String>,

    /// Roles anchored at an inset bottom-left corner instead of the center,
    /// so the label does not cover surrounding inline text.
    pub link_roles: HashSet<String>,

    /// The role that receives a collapsed hint when it has no hintable
    /// descendants of its own.
    pub row_role: String,

    /// Inward offset, in frame units, for corner-anchored labels.
    pub hint_corner_inset: f64,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            excluded_container_roles: DEFAULT_EXCLUDED_CONTAINER_ROLES.clone(),
            ignored_actions: DEFAULT_IGNORED_ACTIONS.clone(),
            table_roles: DEFAULT_TABLE_ROLES.clone(),
            link_roles: DEFAULT_LINK_ROLES.clone(),
            row_role: "row".to_string(),
            hint_corner_inset: 5.0,
        }
    }
}

/// Configuration for the key-sequence trigger listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// The sequences that activate a mode when fully typed.
    pub sequences: Vec<String>,

    /// How long a partially typed sequence may sit idle before the buffered
    /// keystrokes are replayed to the focused application.
    pub reset_delay_ms: u64,

    /// Modifier bits tolerated on events admitted to matching. Anything
    /// beyond this mask disqualifies the event.
    pub tolerated_modifier_mask: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            sequences: vec!["fd".to_string(), "jk".to_string()],
            reset_delay_ms: 250,
            tolerated_modifier_mask: BASELINE_MODIFIER_MASK,
        }
    }
}

impl TriggerConfig {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

/// Top-level configuration for both engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavConfig {
    /// Ordered, duplicate-free symbols used to build hint labels. Symbols
    /// earlier in the string end up on shorter labels.
    pub hint_characters: String,

    #[serde(default)]
    pub discovery: DiscoveryPolicy,

    #[serde(default)]
    pub trigger: TriggerConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            hint_characters: "sadfjklewcmpgh".to_string(),
            discovery: DiscoveryPolicy::default(),
            trigger: TriggerConfig::default(),
        }
    }
}

impl NavConfig {
    /// Reject configurations the engines cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.hint_characters.is_empty() {
            return Err(NavigationError::InvalidArgument(
                "hint alphabet must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for c in self.hint_characters.chars() {
            if !seen.insert(c) {
                return Err(NavigationError::InvalidArgument(format!(
                    "hint alphabet contains duplicate symbol '{c}'"
                )));
            }
        }

        if self.trigger.sequences.is_empty() {
            return Err(NavigationError::InvalidArgument(
                "at least one trigger sequence is required".to_string(),
            ));
        }
        if self.trigger.sequences.iter().any(|s| s.is_empty()) {
            return Err(NavigationError::InvalidArgument(
                "trigger sequences must not be empty".to_string(),
            ));
        }

        if self.discovery.hint_corner_inset < 0.0 {
            return Err(NavigationError::InvalidArgument(
                "hint corner inset must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    /// The hint alphabet as individual symbols.
    pub fn alphabet(&self) -> Vec<char> {
        self.hint_characters.chars().collect()
    }

    /// Serialize to pretty JSON, e.g. for a settings file.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON. The result still needs [`validate`](Self::validate).
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
