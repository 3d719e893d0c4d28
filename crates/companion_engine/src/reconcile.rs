use std::sync::{Arc, RwLock};

use companion_core::{StatusCache, StatusKind};

use crate::client::QueueBackend;
use crate::dom::PageDom;
use crate::inject::{
    ensure_badge, find_single_control, inject_controls, inject_single_control, paint_badge,
};
use crate::scan::ScanRules;
use crate::types::ClientError;

/// Counters from one reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub containers_injected: usize,
    pub rows_injected: usize,
    pub badges_painted: usize,
    pub single_control_added: bool,
    pub refresh_failed: bool,
}

/// Rebuilds the status cache from a fresh queue listing and swaps it in
/// with a single assignment. On failure the previous snapshot is kept:
/// stale-but-present data beats blanking every badge over one bad poll.
pub async fn refresh_cache(
    backend: &dyn QueueBackend,
    cache: &RwLock<StatusCache>,
) -> Result<(), ClientError> {
    let items = backend.list_queue().await.map_err(|err| {
        engine_logging::engine_warn!("queue refresh failed, keeping previous snapshot: {err}");
        err
    })?;
    let entries = items.into_iter().flat_map(|item| {
        let status = StatusKind::parse(&item.status);
        let urls = item.request.map(|request| request.urls).unwrap_or_default();
        urls.into_iter().map(move |url| (url, status))
    });
    let rebuilt = StatusCache::rebuild(entries);
    match cache.write() {
        Ok(mut guard) => *guard = rebuilt,
        Err(poisoned) => *poisoned.into_inner() = rebuilt,
    }
    Ok(())
}

/// The pass that aligns visible page state with backend-reported state:
/// scan containers, inject missing controls (marker-gated), refresh the
/// cache, and paint every valid row's badge from the cache.
///
/// Running it twice with no intervening state change adds no nodes and
/// changes no badge. Overlapping runs are safe: injection is idempotent,
/// the cache swap is atomic, and painting re-reads the cache after the
/// refresh await.
pub struct Reconciler {
    backend: Arc<dyn QueueBackend>,
    cache: Arc<RwLock<StatusCache>>,
    rules: ScanRules,
}

impl Reconciler {
    pub fn new(backend: Arc<dyn QueueBackend>, rules: ScanRules) -> Self {
        Self {
            backend,
            cache: Arc::new(RwLock::new(StatusCache::default())),
            rules,
        }
    }

    pub fn backend(&self) -> Arc<dyn QueueBackend> {
        Arc::clone(&self.backend)
    }

    pub fn rules(&self) -> &ScanRules {
        &self.rules
    }

    /// The shared cache handle; readers always observe a complete snapshot.
    pub fn cache(&self) -> Arc<RwLock<StatusCache>> {
        Arc::clone(&self.cache)
    }

    pub async fn run(&self, page: &mut PageDom) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        if find_single_control(page).is_none() {
            report.single_control_added = inject_single_control(page, &self.rules).is_some();
        }

        let containers: Vec<_> = self.rules.containers(page).collect();
        for &container in &containers {
            if page.is_injected(container) {
                continue;
            }
            let stats = inject_controls(page, &self.rules, container);
            report.containers_injected += 1;
            report.rows_injected += stats.rows_injected;
        }

        report.refresh_failed = refresh_cache(self.backend.as_ref(), &self.cache)
            .await
            .is_err();

        // Snapshot after the await so painting reflects the most recently
        // completed refresh, not a stale closure value.
        let snapshot = match self.cache.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        for &container in &containers {
            for (row, url) in self.rules.valid_rows(page, container) {
                if let Some(badge) = ensure_badge(page, row) {
                    paint_badge(page, badge, snapshot.lookup(&url));
                    report.badges_painted += 1;
                }
            }
        }

        engine_logging::engine_debug!(
            "reconcile: {} container(s) injected, {} row(s), {} badge(s) painted, refresh_failed={}",
            report.containers_injected,
            report.rows_injected,
            report.badges_painted,
            report.refresh_failed
        );
        report
    }
}
