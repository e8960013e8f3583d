//! Behavior tests for the trigger listener's event orchestration.

use super::fixtures::MockTap;
use crate::config::TriggerConfig;
use crate::errors::NavigationError;
use crate::events::{EventDisposition, KeyEvent, BASELINE_MODIFIER_MASK};
use crate::listener::{InputTap, TriggerListener};
use std::sync::Arc;
use std::time::Duration;

fn config() -> TriggerConfig {
    TriggerConfig::default() // "fd" and "jk", 250ms reset delay
}

fn listener_with_tap() -> (TriggerListener, Arc<MockTap>) {
    let tap = Arc::new(MockTap::new());
    let listener = TriggerListener::new(&config(), tap.clone()).expect("listener");
    (listener, tap)
}

fn down(c: char) -> KeyEvent {
    KeyEvent::key_down(c as u32, c)
}

fn up(c: char) -> KeyEvent {
    KeyEvent::key_up(c as u32, c)
}

#[tokio::test]
async fn construction_fails_with_zero_registered_sequences() {
    let tap = Arc::new(MockTap::new());
    let config = TriggerConfig {
        sequences: vec![String::new()],
        ..TriggerConfig::default()
    };
    assert!(matches!(
        TriggerListener::new(&config, tap),
        Err(NavigationError::NoSequencesRegistered)
    ));
}

#[tokio::test]
async fn conflicting_sequences_are_skipped_not_fatal() {
    super::init_tracing();
    let tap = Arc::new(MockTap::new());
    let config = TriggerConfig {
        sequences: vec!["fd".to_string(), "f".to_string()],
        ..TriggerConfig::default()
    };
    let listener = TriggerListener::new(&config, tap).expect("listener");
    assert_eq!(listener.sequences(), &[vec!['f', 'd']]);
}

#[tokio::test]
async fn prefix_keystrokes_are_swallowed() {
    let (listener, tap) = listener_with_tap();
    assert_eq!(listener.handle_event(&down('f')), EventDisposition::Swallow);
    assert!(tap.synthesized().is_empty());
}

#[tokio::test]
async fn key_ups_always_pass_through_live() {
    let (listener, _tap) = listener_with_tap();
    assert_eq!(listener.handle_event(&down('f')), EventDisposition::Swallow);
    assert_eq!(listener.handle_event(&up('f')), EventDisposition::PassThrough);
}

#[tokio::test]
async fn completed_sequence_is_published_and_swallowed() {
    super::init_tracing();
    let (listener, tap) = listener_with_tap();
    let mut rx = listener.subscribe();

    assert_eq!(listener.handle_event(&down('f')), EventDisposition::Swallow);
    assert_eq!(listener.handle_event(&down('d')), EventDisposition::Swallow);

    assert_eq!(rx.try_recv().expect("match"), vec!['f', 'd']);
    // Nothing was replayed.
    assert!(tap.synthesized().is_empty());
}

#[tokio::test]
async fn single_buffered_deadend_passes_the_original_through() {
    let (listener, tap) = listener_with_tap();

    // 'x' starts no sequence: deadend with exactly one buffered key-down.
    assert_eq!(
        listener.handle_event(&down('x')),
        EventDisposition::PassThrough
    );
    // The original event goes through untouched; no synthesized copy.
    assert!(tap.synthesized().is_empty());

    // The listener reset, so a real prefix still works afterwards.
    assert_eq!(listener.handle_event(&down('f')), EventDisposition::Swallow);
}

#[tokio::test]
async fn multi_key_deadend_replays_buffered_events_in_order() {
    let (listener, tap) = listener_with_tap();

    assert_eq!(listener.handle_event(&down('f')), EventDisposition::Swallow);
    assert_eq!(listener.handle_event(&up('f')), EventDisposition::PassThrough);
    // No edge f -> j, even though 'j' starts another sequence.
    assert_eq!(listener.handle_event(&down('j')), EventDisposition::Swallow);

    // f-down, its paired f-up, then j-down (no j-up had arrived).
    assert_eq!(tap.synthesized(), vec![down('f'), up('f'), down('j')]);
}

#[tokio::test]
async fn replay_pairs_the_most_recent_key_up_per_character() {
    let (listener, tap) = listener_with_tap();

    let first_up = KeyEvent {
        key_code: 100,
        ..up('f')
    };
    let second_up = KeyEvent {
        key_code: 101,
        ..up('f')
    };

    listener.handle_event(&first_up);
    listener.handle_event(&second_up);
    listener.handle_event(&down('f'));
    listener.handle_event(&down('x'));

    let synthesized = tap.synthesized();
    assert_eq!(synthesized.len(), 3);
    assert_eq!(synthesized[0], down('f'));
    // Paired by character with the most recently buffered key-up.
    assert_eq!(synthesized[1].key_code, 101);
    assert_eq!(synthesized[2], down('x'));
}

#[tokio::test(start_paused = true)]
async fn inactivity_timeout_replays_and_resets() {
    super::init_tracing();
    let (listener, tap) = listener_with_tap();

    assert_eq!(listener.handle_event(&down('f')), EventDisposition::Swallow);
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(tap.synthesized(), vec![down('f')]);

    // The matcher is back at the root: 'f' is a prefix again, not a
    // continuation of the stale traversal.
    assert_eq!(listener.handle_event(&down('f')), EventDisposition::Swallow);
}

#[tokio::test(start_paused = true)]
async fn accepted_keystroke_rearms_the_timer() {
    let (listener, tap) = listener_with_tap();

    listener.handle_event(&down('f'));
    tokio::time::sleep(Duration::from_millis(150)).await;
    // Still within the window; nothing replayed yet.
    assert!(tap.synthesized().is_empty());

    // 'd' completes the sequence before the timer fires.
    assert_eq!(listener.handle_event(&down('d')), EventDisposition::Swallow);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(tap.synthesized().is_empty());
}

#[tokio::test(start_paused = true)]
async fn no_timer_fires_after_stop() {
    let (listener, tap) = listener_with_tap();
    listener.start().expect("start");

    listener.handle_event(&down('f'));
    listener.stop();
    assert!(!listener.is_started());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(tap.synthesized().is_empty());
}

#[tokio::test]
async fn extraneous_modifiers_disqualify_and_discard_buffers() {
    let (listener, tap) = listener_with_tap();

    assert_eq!(listener.handle_event(&down('f')), EventDisposition::Swallow);

    let chorded = KeyEvent {
        modifiers: BASELINE_MODIFIER_MASK | 0x4_0000,
        ..down('d')
    };
    assert_eq!(
        listener.handle_event(&chorded),
        EventDisposition::PassThrough
    );

    // Buffers were discarded, not replayed.
    assert!(tap.synthesized().is_empty());

    // And the matcher reset: a bare 'd' is now a single-buffered deadend.
    assert_eq!(
        listener.handle_event(&down('d')),
        EventDisposition::PassThrough
    );
    assert!(tap.synthesized().is_empty());
}

#[tokio::test]
async fn hardware_repeats_pass_through_and_reset() {
    let (listener, tap) = listener_with_tap();

    listener.handle_event(&down('f'));
    let repeat = KeyEvent {
        is_repeat: true,
        ..down('d')
    };
    assert_eq!(listener.handle_event(&repeat), EventDisposition::PassThrough);
    assert!(tap.synthesized().is_empty());
}

#[tokio::test]
async fn unresolvable_characters_pass_through_and_reset() {
    let (listener, _tap) = listener_with_tap();

    listener.handle_event(&down('f'));
    let unresolvable = KeyEvent {
        character: None,
        ..down('d')
    };
    assert_eq!(
        listener.handle_event(&unresolvable),
        EventDisposition::PassThrough
    );

    // Reset: 'd' alone deadends as a single buffered event.
    assert_eq!(
        listener.handle_event(&down('d')),
        EventDisposition::PassThrough
    );
}

#[tokio::test]
async fn tap_disable_notification_is_self_healing() {
    let (listener, tap) = listener_with_tap();
    listener.start().expect("start");

    // Host killed delivery (e.g. after a latency stall).
    tap.disable();
    assert!(!listener.is_started());

    listener.handle_tap_disabled();
    assert!(listener.is_started());
}

#[tokio::test]
async fn match_stream_yields_published_sequences() {
    use futures::StreamExt;

    let (listener, _tap) = listener_with_tap();
    let mut stream = Box::pin(listener.match_stream());

    listener.handle_event(&down('j'));
    listener.handle_event(&down('k'));

    assert_eq!(stream.next().await, Some(vec!['j', 'k']));
}
