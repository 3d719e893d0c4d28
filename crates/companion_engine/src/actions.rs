use std::collections::VecDeque;
use std::sync::Arc;

use companion_core::{update_control, ControlEffect, ControlMsg, ControlState, SubmitOutcome};
use ego_tree::NodeId;
use tokio::sync::Mutex;

use crate::client::QueueBackend;
use crate::dom::PageDom;
use crate::inject::{checked_urls, find_batch_button, find_single_control, paint_control};
use crate::reconcile::Reconciler;
use crate::types::ClientError;

/// Executes action-control effects against the real backend, clock, and
/// page: the pure state machine decides, this runner performs.
pub struct ActionRunner {
    backend: Arc<dyn QueueBackend>,
    reconciler: Arc<Reconciler>,
    page: Arc<Mutex<PageDom>>,
}

impl ActionRunner {
    pub fn new(reconciler: Arc<Reconciler>, page: Arc<Mutex<PageDom>>) -> Self {
        Self {
            backend: reconciler.backend(),
            reconciler,
            page,
        }
    }

    /// Drives one activation of a single-item control to completion. The
    /// URL is the page's own item address, not a row. When the page carries
    /// the injected send button, its label and disabled state follow along.
    pub async fn activate_single(&self, state: ControlState, url: String) -> ControlState {
        let button = {
            let page = self.page.lock().await;
            find_single_control(&page)
        };
        self.drive(state, ControlMsg::Activated { urls: vec![url] }, None, button)
            .await
    }

    /// Drives one activation of a container's batch control: collects the
    /// checked rows' canonical URLs, submits them, and after the restore
    /// delay triggers one reconcile so badges pick up the new queue items.
    pub async fn activate_batch(&self, state: ControlState, container: NodeId) -> ControlState {
        let (urls, button) = {
            let page = self.page.lock().await;
            if !page.is_attached(container) {
                // Container replaced under us; nothing to collect or show.
                return state;
            }
            (
                checked_urls(&page, self.reconciler.rules(), container),
                find_batch_button(&page, container),
            )
        };
        self.drive(state, ControlMsg::Activated { urls }, Some(container), button)
            .await
    }

    async fn drive(
        &self,
        mut state: ControlState,
        first: ControlMsg,
        container: Option<NodeId>,
        button: Option<NodeId>,
    ) -> ControlState {
        let mut pending = VecDeque::from([first]);
        while let Some(msg) = pending.pop_front() {
            let (next, effects) = update_control(state, msg);
            state = next;
            if let Some(button) = button {
                let mut page = self.page.lock().await;
                if page.is_attached(button) {
                    paint_control(&mut page, button, &state);
                }
            }
            for effect in effects {
                match effect {
                    ControlEffect::Submit { urls } => {
                        let sent = urls.len();
                        let outcome = match self.backend.submit(&urls, None).await {
                            Ok(()) => SubmitOutcome::Accepted { sent },
                            Err(ClientError::Http { status, .. }) => {
                                engine_logging::engine_warn!(
                                    "backend rejected submit with status {status}"
                                );
                                SubmitOutcome::Rejected
                            }
                            Err(err) => {
                                engine_logging::engine_warn!("submit failed: {err}");
                                SubmitOutcome::NetworkFailed
                            }
                        };
                        pending.push_back(ControlMsg::SubmitFinished(outcome));
                    }
                    ControlEffect::ScheduleRestore { delay } => {
                        tokio::time::sleep(delay).await;
                        pending.push_back(ControlMsg::RestoreElapsed);
                    }
                    ControlEffect::RefreshQueueView => {
                        let mut page = self.page.lock().await;
                        // A response that outlived its container is discarded.
                        if container.is_none_or(|id| page.is_attached(id)) {
                            self.reconciler.run(&mut page).await;
                        }
                    }
                }
            }
        }
        state
    }
}
