use std::time::Duration;

/// Delay before a single-item control returns to idle after a response.
pub const SINGLE_RESTORE_DELAY: Duration = Duration::from_secs(2);
/// Delay before a batch control returns to idle after a response.
pub const BATCH_RESTORE_DELAY: Duration = Duration::from_secs(2);
/// Shorter recovery delay when a batch activation had nothing selected.
pub const EMPTY_SELECTION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Bound to one canonical URL (the current page's own item).
    SingleItem,
    /// Bound to a container; submits every checked row.
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPhase {
    Idle,
    Busy,
    Success,
    Failure,
}

/// One activation's outcome as seen by the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Backend accepted the request (2xx).
    Accepted { sent: usize },
    /// Backend answered with a non-2xx status.
    Rejected,
    /// The request never completed.
    NetworkFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMsg {
    /// User activated the control with the URLs it should submit.
    Activated { urls: Vec<String> },
    /// The submit request finished.
    SubmitFinished(SubmitOutcome),
    /// The fixed restore delay elapsed.
    RestoreElapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEffect {
    /// Post the URLs to the backend submit endpoint.
    Submit { urls: Vec<String> },
    /// Arrange for `RestoreElapsed` after the given delay.
    ScheduleRestore { delay: Duration },
    /// Run one reconcile pass so badges reflect newly queued items.
    RefreshQueueView,
}

/// Action-control state shared by the single-item and batch buttons.
///
/// The machine is `Idle -> Busy -> {Success, Failure} -> Idle`. There is no
/// `Busy -> Busy` edge: while a request is in flight the control is disabled
/// and further activations are ignored, so re-entrant submission is
/// impossible by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    kind: ControlKind,
    phase: ControlPhase,
    idle_label: String,
    label: String,
    enabled: bool,
}

impl ControlState {
    pub fn new(kind: ControlKind, idle_label: impl Into<String>) -> Self {
        let idle_label = idle_label.into();
        Self {
            kind,
            phase: ControlPhase::Idle,
            label: idle_label.clone(),
            idle_label,
            enabled: true,
        }
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn phase(&self) -> ControlPhase {
        self.phase
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Pure update function: applies a message to control state and returns any
/// effects for the driver to execute in order.
pub fn update_control(mut state: ControlState, msg: ControlMsg) -> (ControlState, Vec<ControlEffect>) {
    let effects = match msg {
        ControlMsg::Activated { urls } => {
            if state.phase != ControlPhase::Idle || !state.enabled {
                return (state, Vec::new());
            }
            if state.kind == ControlKind::Batch && urls.is_empty() {
                // Nothing to submit; recover without touching the backend.
                state.phase = ControlPhase::Failure;
                state.enabled = false;
                state.label = "No tracks selected".to_string();
                vec![ControlEffect::ScheduleRestore {
                    delay: EMPTY_SELECTION_DELAY,
                }]
            } else {
                state.phase = ControlPhase::Busy;
                state.enabled = false;
                state.label = "Sending...".to_string();
                vec![ControlEffect::Submit { urls }]
            }
        }
        ControlMsg::SubmitFinished(outcome) => {
            if state.phase != ControlPhase::Busy {
                // Stale response; the control already moved on.
                return (state, Vec::new());
            }
            let (phase, label) = response_label(state.kind, outcome);
            state.phase = phase;
            state.label = label;
            let delay = match state.kind {
                ControlKind::SingleItem => SINGLE_RESTORE_DELAY,
                ControlKind::Batch => BATCH_RESTORE_DELAY,
            };
            let mut effects = vec![ControlEffect::ScheduleRestore { delay }];
            if state.kind == ControlKind::Batch {
                effects.push(ControlEffect::RefreshQueueView);
            }
            effects
        }
        ControlMsg::RestoreElapsed => {
            if matches!(state.phase, ControlPhase::Success | ControlPhase::Failure) {
                state.phase = ControlPhase::Idle;
                state.label = state.idle_label.clone();
                state.enabled = true;
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn response_label(kind: ControlKind, outcome: SubmitOutcome) -> (ControlPhase, String) {
    match (kind, outcome) {
        (ControlKind::SingleItem, SubmitOutcome::Accepted { .. }) => {
            (ControlPhase::Success, "Sent!".to_string())
        }
        (ControlKind::Batch, SubmitOutcome::Accepted { sent }) => {
            (ControlPhase::Success, format!("Done ({sent} sent)"))
        }
        (ControlKind::SingleItem, SubmitOutcome::Rejected) => {
            (ControlPhase::Failure, "Error!".to_string())
        }
        (ControlKind::Batch, SubmitOutcome::Rejected) => {
            (ControlPhase::Failure, "Error sending batch".to_string())
        }
        (_, SubmitOutcome::NetworkFailed) => (ControlPhase::Failure, "Network error".to_string()),
    }
}
