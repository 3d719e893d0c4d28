use std::collections::HashMap;

use crate::StatusKind;

/// Last-known queue status per canonical item URL.
///
/// The cache is rebuilt wholesale from each successful queue listing; there
/// is no incremental merge. A URL absent from the latest snapshot simply
/// looks up as `Unknown` until the backend reports it again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusCache {
    entries: HashMap<String, StatusKind>,
}

impl StatusCache {
    /// Builds a complete snapshot from `(url, status)` pairs. Later pairs
    /// for the same URL win.
    pub fn rebuild<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, StatusKind)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Returns the cached status, or `Unknown` when the URL is absent.
    pub fn lookup(&self, url: &str) -> StatusKind {
        self.entries.get(url).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
