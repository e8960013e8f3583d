//! Hint-selection sessions and mode coordination.
//!
//! A session is born from one discovery pass, lives while the user types a
//! label, and is torn down completely before any other session may start.

use crate::config::NavConfig;
use crate::element::ElementId;
use crate::engine::QueryEngine;
use crate::errors::{NavigationError, Result};
use crate::hints::{assemble, Hint};
use crate::traversal::discover;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Identity of one hint-selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Consumer of session output — typically an overlay renderer plus whatever
/// performs the selected element's action.
#[async_trait]
pub trait HintSink: Send + Sync {
    /// A new session's hints are ready to draw.
    async fn present(&self, session: SessionId, hints: &[Hint]);

    /// A label was fully typed; the session is over.
    async fn selected(&self, session: SessionId, hint: &Hint);

    /// The session ended without a selection.
    async fn dismissed(&self, session: SessionId);
}

/// Result of feeding one label character to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionProgress {
    /// The typed text is still a (possibly empty) label prefix.
    Pending,
    /// The typed text equals a label; labels are prefix-free so this is
    /// always unambiguous.
    Selected(Hint),
    /// The character is not part of the hint alphabet.
    NoMatch,
}

/// One live hint-selection session.
#[derive(Debug)]
pub struct HintSession {
    id: SessionId,
    hints: Vec<Hint>,
    typed: String,
    alphabet: HashSet<char>,
}

impl HintSession {
    fn new(hints: Vec<Hint>, alphabet: &[char]) -> Self {
        Self {
            id: SessionId::new(),
            hints,
            typed: String::new(),
            alphabet: alphabet.iter().map(|c| c.to_ascii_lowercase()).collect(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    /// What the user has typed toward a label so far.
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Feed one character of label input.
    ///
    /// Characters outside the alphabet are reported as [`SelectionProgress::NoMatch`]
    /// without consuming session state — the host usually passes those
    /// through (or treats them as a dismissal).
    pub fn advance_label(&mut self, character: char) -> SelectionProgress {
        let character = character.to_ascii_lowercase();
        if !self.alphabet.contains(&character) {
            return SelectionProgress::NoMatch;
        }

        self.typed.push(character);

        match self
            .hints
            .iter()
            .find(|hint| hint.label().eq_ignore_ascii_case(&self.typed))
        {
            Some(hint) => SelectionProgress::Selected(hint.clone()),
            None => SelectionProgress::Pending,
        }
    }

    /// Erase the most recently typed label character. Returns `false` when
    /// nothing was typed.
    pub fn erase_label_char(&mut self) -> bool {
        self.typed.pop().is_some()
    }

    /// Hints whose labels start with the typed text, for the renderer to
    /// keep highlighted.
    pub fn candidates(&self) -> Vec<&Hint> {
        let typed = self.typed.to_uppercase();
        self.hints
            .iter()
            .filter(|hint| hint.label().starts_with(&typed))
            .collect()
    }
}

/// Coordinates mode activation so that at most one session is ever live.
///
/// Discovery runs on a blocking thread because the query engine may stall on
/// cross-process calls; the live key-event path must never wait on it.
/// Activating a mode always tears the previous session down first — timers
/// cancelled, state cleared — before any new resources are created.
pub struct ModeCoordinator {
    engine: Arc<dyn QueryEngine>,
    sink: Arc<dyn HintSink>,
    config: NavConfig,
    active: tokio::sync::Mutex<Option<HintSession>>,
}

impl ModeCoordinator {
    pub fn new(
        engine: Arc<dyn QueryEngine>,
        sink: Arc<dyn HintSink>,
        config: NavConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine,
            sink,
            config,
            active: tokio::sync::Mutex::new(None),
        })
    }

    /// Discover hintable elements under `root`, assemble hints, present
    /// them, and make the new session current.
    #[instrument(skip(self))]
    pub async fn activate_hint_mode(&self, root: ElementId) -> Result<SessionId> {
        self.deactivate().await;

        let engine = Arc::clone(&self.engine);
        let policy = self.config.discovery.clone();
        let tree = tokio::task::spawn_blocking(move || discover(engine.as_ref(), root, &policy))
            .await
            .map_err(|e| NavigationError::Internal(format!("discovery task failed: {e}")))??;

        let elements = tree.query();
        let alphabet = self.config.alphabet();
        let hints = assemble(&elements, &alphabet, &self.config.discovery)?;

        let session = HintSession::new(hints, &alphabet);
        let id = session.id();
        info!(session = %id, hints = session.hints().len(), "hint mode activated");

        self.sink.present(id, session.hints()).await;
        *self.active.lock().await = Some(session);
        Ok(id)
    }

    /// Route one character of label input to the active session. Selecting a
    /// hint ends the session before the sink hears about the selection, so a
    /// slow consumer can never observe two live sessions.
    pub async fn handle_label_key(&self, character: char) -> SelectionProgress {
        let mut guard = self.active.lock().await;
        let Some(session) = guard.as_mut() else {
            return SelectionProgress::NoMatch;
        };

        match session.advance_label(character) {
            SelectionProgress::Selected(hint) => {
                let id = session.id();
                guard.take();
                drop(guard);
                debug!(session = %id, label = hint.label(), "hint selected");
                self.sink.selected(id, &hint).await;
                SelectionProgress::Selected(hint)
            }
            progress => progress,
        }
    }

    /// Erase one typed label character in the active session.
    pub async fn erase_label_key(&self) -> bool {
        match self.active.lock().await.as_mut() {
            Some(session) => session.erase_label_char(),
            None => false,
        }
    }

    /// Tear down the active session, if any.
    pub async fn deactivate(&self) {
        let previous = self.active.lock().await.take();
        if let Some(session) = previous {
            debug!(session = %session.id(), "tearing down hint session");
            self.sink.dismissed(session.id()).await;
        }
    }

    /// Identity of the live session, if one exists.
    pub async fn active_session(&self) -> Option<SessionId> {
        self.active.lock().await.as_ref().map(HintSession::id)
    }
}
