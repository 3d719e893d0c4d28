use serde::Serialize;
use serde_json::Value;

use crate::settings::{resolve_base_url, BaseUrlProvider};
use crate::types::{ClientError, QueueItem, RemoteConfig};

/// The backend queue API: submit work, list the queue, move config.
///
/// All operations are stateless request/response wrappers; callers own any
/// caching. No retries anywhere.
#[async_trait::async_trait]
pub trait QueueBackend: Send + Sync {
    /// Posts `{urls, type?}` to the submit endpoint. `kind` is omitted from
    /// the body when `None` (the single-URL legacy shape).
    async fn submit(&self, urls: &[String], kind: Option<&str>) -> Result<(), ClientError>;

    /// Lists the queue, normalizing both accepted response shapes
    /// (`{downloads: [...]}` and a bare array).
    async fn list_queue(&self) -> Result<Vec<QueueItem>, ClientError>;

    /// Fetches the backend config, accepting `{config: {...}}` or a bare
    /// object.
    async fn get_config(&self) -> Result<RemoteConfig, ClientError>;

    /// Replaces the backend config.
    async fn set_config(&self, config: &RemoteConfig) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    urls: &'a [String],
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'a str>,
}

/// Reqwest-backed implementation of [`QueueBackend`].
#[derive(Debug, Clone)]
pub struct HttpQueueBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpQueueBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Builds a client whose base URL comes from the injected provider,
    /// falling back to the default when the store is absent.
    pub async fn from_provider(provider: &dyn BaseUrlProvider) -> Self {
        Self::new(resolve_base_url(provider).await)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, ClientError> {
        let response = ensure_success(response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|err| ClientError::bad_shape(err.to_string()))
    }
}

#[async_trait::async_trait]
impl QueueBackend for HttpQueueBackend {
    async fn submit(&self, urls: &[String], kind: Option<&str>) -> Result<(), ClientError> {
        let body = SubmitBody { urls, kind };
        let response = self
            .client
            .post(self.endpoint("/download"))
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;
        ensure_success(response).await?;
        engine_logging::engine_debug!("submitted {} url(s) to backend", urls.len());
        Ok(())
    }

    async fn list_queue(&self) -> Result<Vec<QueueItem>, ClientError> {
        let response = self
            .client
            .get(self.endpoint("/downloads"))
            .send()
            .await
            .map_err(map_transport_error)?;
        normalize_queue(Self::read_json(response).await?)
    }

    async fn get_config(&self) -> Result<RemoteConfig, ClientError> {
        let response = self
            .client
            .get(self.endpoint("/config"))
            .send()
            .await
            .map_err(map_transport_error)?;
        normalize_config(Self::read_json(response).await?)
    }

    async fn set_config(&self, config: &RemoteConfig) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.endpoint("/config"))
            .json(config)
            .send()
            .await
            .map_err(map_transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Http {
        status: status.as_u16(),
        body,
    })
}

fn map_transport_error(err: reqwest::Error) -> ClientError {
    ClientError::network(err.to_string())
}

/// Sole point of shape tolerance for the queue listing: unwraps the
/// `downloads` field when present, otherwise expects a bare array.
fn normalize_queue(value: Value) -> Result<Vec<QueueItem>, ClientError> {
    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove("downloads")
            .ok_or_else(|| ClientError::bad_shape("object without a downloads field"))?,
        other => {
            return Err(ClientError::bad_shape(format!(
                "expected array or object, got {other}"
            )))
        }
    };
    serde_json::from_value(list).map_err(|err| ClientError::bad_shape(err.to_string()))
}

/// Unwraps the optional `config` envelope around the config object.
fn normalize_config(value: Value) -> Result<RemoteConfig, ClientError> {
    let object = match value {
        Value::Object(mut map) => match map.remove("config") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                return Err(ClientError::bad_shape(format!(
                    "config field is not an object: {other}"
                )))
            }
            None => Value::Object(map),
        },
        other => {
            return Err(ClientError::bad_shape(format!(
                "expected config object, got {other}"
            )))
        }
    };
    serde_json::from_value(object).map_err(|err| ClientError::bad_shape(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{normalize_config, normalize_queue};
    use crate::types::ClientError;
    use serde_json::json;

    #[test]
    fn queue_accepts_wrapped_and_bare_arrays() {
        let wrapped = json!({"downloads": [{"id": "a", "status": "queued"}]});
        let bare = json!([{"id": "a", "status": "queued"}]);
        assert_eq!(
            normalize_queue(wrapped).expect("wrapped"),
            normalize_queue(bare).expect("bare")
        );
    }

    #[test]
    fn queue_rejects_other_shapes() {
        let err = normalize_queue(json!({"items": []})).unwrap_err();
        assert!(matches!(err, ClientError::BadShape { .. }));
        let err = normalize_queue(json!("nope")).unwrap_err();
        assert!(matches!(err, ClientError::BadShape { .. }));
    }

    #[test]
    fn config_accepts_wrapped_and_bare_objects() {
        let wrapped = json!({"config": {"quality": "lossless"}});
        let bare = json!({"quality": "lossless"});
        assert_eq!(
            normalize_config(wrapped).expect("wrapped"),
            normalize_config(bare).expect("bare")
        );
    }
}
