//! Companion core: pure status model, cache, and action-control state machine.
mod cache;
mod control;
mod status;

pub use cache::StatusCache;
pub use control::{
    update_control, ControlEffect, ControlKind, ControlMsg, ControlPhase, ControlState,
    SubmitOutcome, BATCH_RESTORE_DELAY, EMPTY_SELECTION_DELAY, SINGLE_RESTORE_DELAY,
};
pub use status::{BadgeStyle, StatusKind};
