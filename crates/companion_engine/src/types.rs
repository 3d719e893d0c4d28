use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque backend configuration: string keys to string values. The engine
/// transports it without interpreting any entry.
pub type RemoteConfig = BTreeMap<String, String>;

/// One submitted job as reported by the backend queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    #[serde(default)]
    pub id: String,
    /// Raw status string; parsed to a `StatusKind` when the cache is built.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub request: Option<DownloadRequest>,
}

/// The request half of a queue item: what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Failures surfaced by the backend client. All of them are recovered at
/// the action-control or reconciler boundary; none propagate further.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("http status {status}: {body}")]
    Http { status: u16, body: String },
    #[error("unexpected response shape: {message}")]
    BadShape { message: String },
}

impl ClientError {
    pub(crate) fn network(message: impl Into<String>) -> Self {
        ClientError::Network {
            message: message.into(),
        }
    }

    pub(crate) fn bad_shape(message: impl Into<String>) -> Self {
        ClientError::BadShape {
            message: message.into(),
        }
    }
}
