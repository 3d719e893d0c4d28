use std::sync::Once;

use companion_core::{
    update_control, ControlEffect, ControlKind, ControlMsg, ControlPhase, ControlState,
    SubmitOutcome, BATCH_RESTORE_DELAY, EMPTY_SELECTION_DELAY, SINGLE_RESTORE_DELAY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|url| url.to_string()).collect()
}

#[test]
fn single_item_success_round_trip() {
    init_logging();
    let state = ControlState::new(ControlKind::SingleItem, "Send to downloader");

    let (state, effects) = update_control(
        state,
        ControlMsg::Activated {
            urls: urls(&["https://site/track/1"]),
        },
    );
    assert_eq!(state.phase(), ControlPhase::Busy);
    assert!(!state.is_enabled());
    assert_eq!(state.label(), "Sending...");
    assert_eq!(
        effects,
        vec![ControlEffect::Submit {
            urls: urls(&["https://site/track/1"]),
        }]
    );

    let (state, effects) = update_control(
        state,
        ControlMsg::SubmitFinished(SubmitOutcome::Accepted { sent: 1 }),
    );
    assert_eq!(state.phase(), ControlPhase::Success);
    assert_eq!(state.label(), "Sent!");
    assert_eq!(
        effects,
        vec![ControlEffect::ScheduleRestore {
            delay: SINGLE_RESTORE_DELAY,
        }]
    );

    let (state, effects) = update_control(state, ControlMsg::RestoreElapsed);
    assert_eq!(state.phase(), ControlPhase::Idle);
    assert_eq!(state.label(), "Send to downloader");
    assert!(state.is_enabled());
    assert!(effects.is_empty());
}

#[test]
fn single_item_rejection_and_network_labels() {
    init_logging();
    let busy = |state| {
        let (state, _) = update_control(
            state,
            ControlMsg::Activated {
                urls: urls(&["https://site/track/1"]),
            },
        );
        state
    };

    let state = busy(ControlState::new(ControlKind::SingleItem, "Send"));
    let (state, _) = update_control(state, ControlMsg::SubmitFinished(SubmitOutcome::Rejected));
    assert_eq!(state.phase(), ControlPhase::Failure);
    assert_eq!(state.label(), "Error!");

    let state = busy(ControlState::new(ControlKind::SingleItem, "Send"));
    let (state, _) = update_control(
        state,
        ControlMsg::SubmitFinished(SubmitOutcome::NetworkFailed),
    );
    assert_eq!(state.phase(), ControlPhase::Failure);
    assert_eq!(state.label(), "Network error");
}

#[test]
fn batch_success_reports_count_and_refreshes() {
    init_logging();
    let state = ControlState::new(ControlKind::Batch, "Download Selected");
    let (state, _) = update_control(
        state,
        ControlMsg::Activated {
            urls: urls(&["https://site/track/1", "https://site/track/2"]),
        },
    );
    let (state, effects) = update_control(
        state,
        ControlMsg::SubmitFinished(SubmitOutcome::Accepted { sent: 2 }),
    );
    assert_eq!(state.phase(), ControlPhase::Success);
    assert_eq!(state.label(), "Done (2 sent)");
    assert_eq!(
        effects,
        vec![
            ControlEffect::ScheduleRestore {
                delay: BATCH_RESTORE_DELAY,
            },
            ControlEffect::RefreshQueueView,
        ]
    );
}

#[test]
fn batch_rejection_shows_batch_error() {
    init_logging();
    let state = ControlState::new(ControlKind::Batch, "Download Selected");
    let (state, _) = update_control(
        state,
        ControlMsg::Activated {
            urls: urls(&["https://site/track/1"]),
        },
    );
    let (state, effects) =
        update_control(state, ControlMsg::SubmitFinished(SubmitOutcome::Rejected));
    assert_eq!(state.phase(), ControlPhase::Failure);
    assert_eq!(state.label(), "Error sending batch");
    // Even a failed batch repaints afterwards so stale badges do not linger.
    assert!(effects.contains(&ControlEffect::RefreshQueueView));
}

#[test]
fn empty_batch_selection_never_submits() {
    init_logging();
    let state = ControlState::new(ControlKind::Batch, "Download Selected");
    let (state, effects) = update_control(state, ControlMsg::Activated { urls: Vec::new() });

    assert_eq!(state.phase(), ControlPhase::Failure);
    assert_eq!(state.label(), "No tracks selected");
    assert!(!state.is_enabled());
    assert_eq!(
        effects,
        vec![ControlEffect::ScheduleRestore {
            delay: EMPTY_SELECTION_DELAY,
        }]
    );

    let (state, effects) = update_control(state, ControlMsg::RestoreElapsed);
    assert_eq!(state.phase(), ControlPhase::Idle);
    assert_eq!(state.label(), "Download Selected");
    assert!(state.is_enabled());
    assert!(effects.is_empty());
}

#[test]
fn busy_control_ignores_reactivation() {
    init_logging();
    let state = ControlState::new(ControlKind::SingleItem, "Send");
    let (state, _) = update_control(
        state,
        ControlMsg::Activated {
            urls: urls(&["https://site/track/1"]),
        },
    );
    let before = state.clone();
    let (state, effects) = update_control(
        state,
        ControlMsg::Activated {
            urls: urls(&["https://site/track/2"]),
        },
    );
    assert_eq!(state, before);
    assert!(effects.is_empty());
}

#[test]
fn stale_response_after_restore_is_ignored() {
    init_logging();
    let state = ControlState::new(ControlKind::SingleItem, "Send");
    let before = state.clone();
    let (state, effects) = update_control(
        state,
        ControlMsg::SubmitFinished(SubmitOutcome::Accepted { sent: 1 }),
    );
    assert_eq!(state, before);
    assert!(effects.is_empty());
}
