//! Request/push event channel to the application server.

use async_trait::async_trait;
use serde_json::Value;
use shiftlink_core::UploadError;

use crate::ApiClient;

/// Named events addressed to a server-side scope.
///
/// `request` waits for the server's JSON reply; `push` is fire-and-forget from the
/// caller's point of view and only reports transport failures.
#[async_trait]
pub trait EventChannel: Send + Sync {
    async fn request(&self, target: &str, event: &str, payload: Value)
        -> Result<Value, UploadError>;

    async fn push(&self, target: &str, event: &str, payload: Value) -> Result<(), UploadError>;
}

/// `/live/{target}/events/{event}`
pub fn event_path(target: &str, event: &str) -> String {
    format!(
        "/live/{}/events/{}",
        urlencoding::encode(target),
        urlencoding::encode(event)
    )
}

#[async_trait]
impl EventChannel for ApiClient {
    async fn request(
        &self,
        target: &str,
        event: &str,
        payload: Value,
    ) -> Result<Value, UploadError> {
        self.post_json(&event_path(target, event), &payload)
            .await
            .map_err(|e| UploadError::Channel(format!("{:#}", e)))
    }

    async fn push(&self, target: &str, event: &str, payload: Value) -> Result<(), UploadError> {
        self.post(&event_path(target, event), &payload)
            .await
            .map_err(|e| UploadError::Channel(format!("{:#}", e)))
    }
}
