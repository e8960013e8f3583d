//! Live key-event orchestration for trigger sequences.
//!
//! The listener sits on the host's system-wide key event stream. Ordinary
//! typing must never be delayed: every event gets a synchronous pass/swallow
//! decision, and keystrokes that were speculatively swallowed as a possible
//! sequence prefix are replayed the moment the speculation fails or times
//! out.

use crate::config::TriggerConfig;
use crate::errors::{NavigationError, Result};
use crate::events::{EventDisposition, KeyEvent};
use crate::matcher::{MatcherState, SequenceMatcher};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tracing::{debug, info, warn};

/// Host seam for the raw input tap.
///
/// Synthesized events are posted back to the host event stream during
/// replay. Hosts must ensure replayed events are not fed back into
/// [`TriggerListener::handle_event`], or a buffered prefix could replay
/// into itself.
pub trait InputTap: Send + Sync {
    /// Request event delivery. Returns `false` when the host refused.
    fn enable(&self) -> bool;

    /// Stop event delivery.
    fn disable(&self);

    fn is_enabled(&self) -> bool;

    /// Post a synthesized copy of `event` to the host event stream.
    fn synthesize(&self, event: &KeyEvent);
}

struct ListenerState {
    matcher: SequenceMatcher,
    /// Accepted key-downs, in arrival order, pending replay or match.
    typed: Vec<KeyEvent>,
    /// Key-ups seen since the last reset, retained only for replay pairing.
    key_ups: Vec<KeyEvent>,
    timer: Option<JoinHandle<()>>,
    /// Bumped on every reset and re-arm; a timer firing with a stale
    /// generation is a no-op.
    timer_generation: u64,
}

struct ListenerShared {
    state: Mutex<ListenerState>,
    tap: Arc<dyn InputTap>,
    match_tx: broadcast::Sender<Vec<char>>,
    reset_delay: Duration,
    tolerated_modifiers: u64,
    runtime: tokio::runtime::Handle,
}

/// Watches an unfiltered key event stream for registered trigger sequences.
///
/// Per key-down: events carrying extraneous modifiers, hardware repeats, or
/// an unresolvable character reset the listener and pass through untouched.
/// Everything else is buffered and fed to the matcher — swallowed while a
/// sequence is still possible, published as a match when one completes, and
/// replayed in original order (key-ups paired by character) when the
/// sequence falls apart or the inactivity timer fires. Key-ups always pass
/// through live.
pub struct TriggerListener {
    shared: Arc<ListenerShared>,
    sequences: Vec<Vec<char>>,
}

impl TriggerListener {
    /// Register `config.sequences` and wire up the tap.
    ///
    /// Sequences that would be ambiguous against an earlier registration are
    /// skipped with a warning; construction fails only when zero sequences
    /// registered, because then there is nothing to match against. Must be
    /// called from within a Tokio runtime — the inactivity timer runs on it.
    pub fn new(config: &TriggerConfig, tap: Arc<dyn InputTap>) -> Result<Self> {
        let mut matcher = SequenceMatcher::new();
        let mut sequences = Vec::new();

        for sequence in &config.sequences {
            let word: Vec<char> = sequence.chars().collect();
            match matcher.add_word(&word)? {
                true => sequences.push(word),
                false => warn!(
                    sequence = %sequence,
                    "trigger sequence conflicts with an existing registration, skipping"
                ),
            }
        }

        if sequences.is_empty() {
            return Err(NavigationError::NoSequencesRegistered);
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            NavigationError::Internal(
                "trigger listener requires a Tokio runtime for its inactivity timer".to_string(),
            )
        })?;

        let (match_tx, _) = broadcast::channel(16);

        info!(sequences = sequences.len(), "trigger listener ready");
        Ok(Self {
            shared: Arc::new(ListenerShared {
                state: Mutex::new(ListenerState {
                    matcher,
                    typed: Vec::new(),
                    key_ups: Vec::new(),
                    timer: None,
                    timer_generation: 0,
                }),
                tap,
                match_tx,
                reset_delay: config.reset_delay(),
                tolerated_modifiers: config.tolerated_modifier_mask,
                runtime,
            }),
            sequences,
        })
    }

    /// The sequences that actually registered.
    pub fn sequences(&self) -> &[Vec<char>] {
        &self.sequences
    }

    /// Decide the fate of one incoming event. Synchronous and non-blocking;
    /// the host input subsystem calls this once per system-wide key event.
    pub fn handle_event(&self, event: &KeyEvent) -> EventDisposition {
        ListenerShared::handle_event(&self.shared, event)
    }

    /// Matched sequences as an async stream.
    pub fn match_stream(&self) -> impl Stream<Item = Vec<char>> {
        let mut rx = self.shared.match_tx.subscribe();
        Box::pin(async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(word) => yield word,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("match stream lagged, skipped {} matches", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Direct broadcast subscription, for hosts that prefer a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<char>> {
        self.shared.match_tx.subscribe()
    }

    /// Ask the host to start delivering events.
    pub fn start(&self) -> Result<()> {
        if self.shared.tap.enable() {
            info!("trigger listener started");
            Ok(())
        } else {
            Err(NavigationError::EventSource(
                "input tap refused to enable".to_string(),
            ))
        }
    }

    /// Stop event delivery and drop all speculative state.
    pub fn stop(&self) {
        self.shared.tap.disable();
        self.reset();
        info!("trigger listener stopped");
    }

    pub fn is_started(&self) -> bool {
        self.shared.tap.is_enabled()
    }

    /// Discard buffers, reset the matcher, and cancel any armed timer.
    pub fn reset(&self) {
        if let Ok(mut state) = self.shared.state.lock() {
            self.shared.reset_locked(&mut state);
        }
    }

    /// The host disabled event delivery (typically after a latency stall).
    /// This is an expected transient failure: re-request delivery
    /// immediately rather than giving up.
    pub fn handle_tap_disabled(&self) {
        warn!("input tap disabled by host, re-enabling");
        if !self.shared.tap.enable() {
            warn!("input tap could not be re-enabled");
        }
    }
}

impl ListenerShared {
    fn handle_event(shared: &Arc<Self>, event: &KeyEvent) -> EventDisposition {
        let Ok(mut state) = shared.state.lock() else {
            return EventDisposition::PassThrough;
        };

        // Admission filter: chorded input, hardware repeats, and events with
        // no resolvable character disqualify the pending sequence entirely.
        if event.modifiers & !shared.tolerated_modifiers != 0 {
            shared.reset_locked(&mut state);
            return EventDisposition::PassThrough;
        }
        let Some(character) = event.character else {
            shared.reset_locked(&mut state);
            return EventDisposition::PassThrough;
        };
        if event.is_repeat {
            shared.reset_locked(&mut state);
            return EventDisposition::PassThrough;
        }

        // Key-ups pass through live, retained only so a later replay can
        // pair them with their key-down.
        if !event.is_key_down {
            state.key_ups.push(*event);
            return EventDisposition::PassThrough;
        }

        state.typed.push(*event);

        let outcome = match state.matcher.advance(character) {
            Ok(outcome) => outcome,
            Err(_) => {
                shared.reset_locked(&mut state);
                return EventDisposition::PassThrough;
            }
        };

        match outcome {
            MatcherState::Advancable => {
                Self::arm_timer(shared, &mut state);
                EventDisposition::Swallow
            }
            MatcherState::Matched => {
                if let Ok(word) = state.matcher.matched_word() {
                    debug!(sequence = ?word, "trigger sequence matched");
                    let _ = shared.match_tx.send(word);
                }
                shared.reset_locked(&mut state);
                EventDisposition::Swallow
            }
            MatcherState::Deadend => {
                if state.typed.len() == 1 {
                    // Common case: the first typed key is just a normal
                    // character. It is the current event, so passing it
                    // through untouched beats synthesizing a copy.
                    shared.reset_locked(&mut state);
                    EventDisposition::PassThrough
                } else {
                    shared.replay_locked(&state);
                    shared.reset_locked(&mut state);
                    EventDisposition::Swallow
                }
            }
            // advance() only ever reports the three states above.
            _ => {
                shared.reset_locked(&mut state);
                EventDisposition::PassThrough
            }
        }
    }

    /// Replay every buffered key-down in original order, each immediately
    /// followed by the most recently buffered key-up with the same resolved
    /// character, if any arrived.
    fn replay_locked(&self, state: &ListenerState) {
        debug!(events = state.typed.len(), "replaying buffered keystrokes");
        for down in &state.typed {
            self.tap.synthesize(down);
            if let Some(up) = state
                .key_ups
                .iter()
                .rev()
                .find(|up| up.character == down.character)
            {
                self.tap.synthesize(up);
            }
        }
    }

    fn reset_locked(&self, state: &mut ListenerState) {
        state.typed.clear();
        state.key_ups.clear();
        state.matcher.reset_input();
        state.timer_generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// (Re)arm the single-shot inactivity timer. If it fires before another
    /// accepted key-down, the buffered prefix was ordinary typing after all
    /// and gets replayed.
    fn arm_timer(shared: &Arc<Self>, state: &mut ListenerState) {
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.timer_generation += 1;
        let generation = state.timer_generation;

        let task_shared = Arc::clone(shared);
        let delay = shared.reset_delay;
        state.timer = Some(shared.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task_shared.on_timeout(generation);
        }));
    }

    fn on_timeout(&self, generation: u64) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.timer_generation != generation {
            return;
        }
        debug!("sequence inactivity timeout, replaying");
        self.replay_locked(&state);
        self.reset_locked(&mut state);
    }
}
