//! State machine classifying one live symbol stream against registered
//! sequences.

use crate::errors::{NavigationError, Result};
use crate::trie::{NodeId, Trie};
use tracing::error;

/// Where the matcher currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherState {
    /// Freshly created; only [`SequenceMatcher::add_word`] is valid.
    Initialized,
    /// At least one sequence registered, cursor at the root.
    WordsAdded,
    /// Mid-sequence: the symbols seen so far are a strict prefix of at least
    /// one registered sequence.
    Advancable,
    /// The last symbol fell off every registered sequence. Terminal until
    /// [`SequenceMatcher::reset_input`].
    Deadend,
    /// A full sequence was entered. Terminal until
    /// [`SequenceMatcher::reset_input`].
    Matched,
}

/// Trie-backed matcher with a single live traversal cursor.
///
/// Registration rejects any sequence that is a prefix of an existing one or
/// that an existing one is a prefix of, in either registration order, so at
/// traversal time a terminal node is always a leaf and a match can be
/// declared the moment it is reached.
#[derive(Debug)]
pub struct SequenceMatcher {
    trie: Trie,
    cursor: NodeId,
    state: MatcherState,
}

impl SequenceMatcher {
    pub fn new() -> Self {
        let trie = Trie::new();
        let cursor = trie.root();
        Self {
            trie,
            cursor,
            state: MatcherState::Initialized,
        }
    }

    pub fn state(&self) -> MatcherState {
        self.state
    }

    /// Register a sequence.
    ///
    /// Returns `Ok(false)` without mutating anything when the sequence would
    /// be ambiguous against an already-registered one (or is empty). Returns
    /// [`NavigationError::InvalidState`] when called after matching has
    /// begun — that is a caller bug.
    pub fn add_word(&mut self, word: &[char]) -> Result<bool> {
        if !matches!(
            self.state,
            MatcherState::Initialized | MatcherState::WordsAdded
        ) {
            return Err(self.invalid_transition("add_word"));
        }

        // Ordering-independent ambiguity check: neither an existing sequence
        // nor the new one may be a prefix of the other.
        if self.trie.is_prefix(word) || self.trie.does_prefix_word_exist(word) {
            return Ok(false);
        }

        self.trie.add_word(word);
        self.state = MatcherState::WordsAdded;
        Ok(true)
    }

    /// Feed one symbol and classify it.
    ///
    /// Valid only in `WordsAdded`/`Advancable`. On a missing edge the cursor
    /// stays put and the state becomes `Deadend`; otherwise the cursor moves
    /// and the state becomes `Matched` (terminal child) or `Advancable`.
    pub fn advance(&mut self, symbol: char) -> Result<MatcherState> {
        if !matches!(
            self.state,
            MatcherState::WordsAdded | MatcherState::Advancable
        ) {
            return Err(self.invalid_transition("advance"));
        }

        match self.trie.child(self.cursor, symbol) {
            None => {
                self.state = MatcherState::Deadend;
            }
            Some(child) => {
                self.cursor = child;
                if self.trie.is_terminal(child) {
                    debug_assert!(
                        !self.trie.has_children(child),
                        "terminal trie node must be a leaf"
                    );
                    self.state = MatcherState::Matched;
                } else {
                    self.state = MatcherState::Advancable;
                }
            }
        }

        Ok(self.state)
    }

    /// The sequence that was just matched, reconstructed by walking parent
    /// back-references from the cursor up to (but excluding) the root.
    ///
    /// Valid only in `Matched`.
    pub fn matched_word(&self) -> Result<Vec<char>> {
        if self.state != MatcherState::Matched {
            return Err(self.invalid_transition("matched_word"));
        }

        let mut word = Vec::new();
        let mut node = self.cursor;
        while let Some(parent) = self.trie.parent(node) {
            word.push(self.trie.symbol(node));
            node = parent;
        }
        word.reverse();
        Ok(word)
    }

    /// Return the cursor to the root, ready for new input.
    ///
    /// The reset target after every terminal outcome, timeout, or
    /// disqualifying event.
    pub fn reset_input(&mut self) {
        self.cursor = self.trie.root();
        self.state = MatcherState::WordsAdded;
    }

    fn invalid_transition(&self, call: &str) -> NavigationError {
        error!(state = ?self.state, call, "sequence matcher called from invalid state");
        NavigationError::InvalidState(format!("{call} is not valid in {:?}", self.state))
    }
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}
