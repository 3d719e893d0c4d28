use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use crate::dom::PageDom;
use crate::reconcile::Reconciler;

/// Default quiet window for collapsing mutation bursts.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(50);

/// Cheap handle for reporting that the page mutated.
#[derive(Debug, Clone)]
pub struct MutationNotifier {
    tx: mpsc::UnboundedSender<()>,
}

impl MutationNotifier {
    /// Records one mutation batch. Never blocks; dropped watchers make this
    /// a no-op.
    pub fn notify(&self) {
        let _ = self.tx.send(());
    }
}

/// Receives mutation notifications and coalesces bursts.
///
/// Reconciliation is idempotent, so running once per mutation would be
/// correct but wasteful under heavy DOM churn. The watcher instead waits a
/// short quiet window after the first notification, drains everything that
/// piled up, and reports a single burst.
#[derive(Debug)]
pub struct MutationWatcher {
    rx: mpsc::UnboundedReceiver<()>,
    quiet_window: Duration,
}

impl MutationWatcher {
    pub fn new(quiet_window: Duration) -> (Self, MutationNotifier) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx, quiet_window }, MutationNotifier { tx })
    }

    /// Waits for the next coalesced burst. Returns `false` once every
    /// notifier has been dropped and the channel drained.
    pub async fn wait_for_burst(&mut self) -> bool {
        if self.rx.recv().await.is_none() {
            return false;
        }
        tokio::time::sleep(self.quiet_window).await;
        while self.rx.try_recv().is_ok() {}
        true
    }
}

/// Drives the reconciler from mutation bursts until all notifiers are gone.
pub async fn watch_loop(
    mut watcher: MutationWatcher,
    reconciler: Arc<Reconciler>,
    page: Arc<Mutex<PageDom>>,
) {
    while watcher.wait_for_burst().await {
        let mut page = page.lock().await;
        let report = reconciler.run(&mut page).await;
        engine_logging::engine_trace!(
            "mutation burst reconciled ({} badge(s) painted)",
            report.badges_painted
        );
    }
}
