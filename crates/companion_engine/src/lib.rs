//! Companion engine: page-DOM injection, queue-state reconciliation, and
//! the HTTP client for the download-queue backend.
mod actions;
mod client;
mod dom;
mod inject;
mod reconcile;
mod scan;
mod settings;
mod types;
mod watch;

pub use actions::ActionRunner;
pub use client::{HttpQueueBackend, QueueBackend};
pub use dom::{PageDom, PageElement, PageNode};
pub use inject::{
    checked_urls, find_batch_button, find_single_control, inject_single_control, paint_control,
    set_row_checked, BADGE_CLASS, BATCH_BUTTON_CLASS, BATCH_BUTTON_LABEL, CHECKBOX_CLASS,
    SINGLE_BUTTON_CLASS, SINGLE_BUTTON_LABEL,
};
pub use reconcile::{refresh_cache, ReconcileReport, Reconciler};
pub use scan::ScanRules;
pub use settings::{BaseUrlProvider, SettingsError, StaticBaseUrl, StoredBaseUrl, DEFAULT_BASE_URL};
pub use types::{ClientError, DownloadRequest, QueueItem, RemoteConfig};
pub use watch::{watch_loop, MutationNotifier, MutationWatcher, DEFAULT_QUIET_WINDOW};
