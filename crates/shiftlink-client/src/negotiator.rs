//! Asks the server for a signed upload endpoint before any bytes are sent.

use std::sync::Arc;

use shiftlink_core::constants::EVENT_REQUEST_UPLOAD;
use shiftlink_core::{LocalFile, NegotiationReply, UploadGrant, UploadRequest, UploadResult};
use tracing::{debug, warn};

use crate::channel::EventChannel;

#[derive(Clone)]
pub struct SessionNegotiator {
    channel: Arc<dyn EventChannel>,
    target: String,
}

impl SessionNegotiator {
    pub fn new(channel: Arc<dyn EventChannel>, target: impl Into<String>) -> Self {
        Self {
            channel,
            target: target.into(),
        }
    }

    /// One round trip. A declined reply becomes `UploadError::Negotiation` with the
    /// server's message; there is no retry.
    pub async fn negotiate(&self, file: &LocalFile) -> UploadResult<UploadGrant> {
        let request = UploadRequest {
            filename: file.name().to_string(),
            content_type: file.mime_type().to_string(),
        };
        debug!(
            target_scope = %self.target,
            filename = %request.filename,
            content_type = %request.content_type,
            "Requesting upload endpoint"
        );

        let payload = serde_json::to_value(&request)?;
        let reply = self
            .channel
            .request(&self.target, EVENT_REQUEST_UPLOAD, payload)
            .await?;
        let reply: NegotiationReply = serde_json::from_value(reply)?;

        reply.into_grant().inspect_err(|err| {
            warn!(target_scope = %self.target, error = %err, "Upload request declined");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use shiftlink_core::UploadError;
    use std::sync::Mutex;

    struct CannedChannel {
        reply: Value,
        seen: Mutex<Vec<(String, String, Value)>>,
    }

    #[async_trait]
    impl EventChannel for CannedChannel {
        async fn request(
            &self,
            target: &str,
            event: &str,
            payload: Value,
        ) -> Result<Value, UploadError> {
            self.seen
                .lock()
                .unwrap()
                .push((target.to_string(), event.to_string(), payload));
            Ok(self.reply.clone())
        }

        async fn push(&self, _: &str, _: &str, _: Value) -> Result<(), UploadError> {
            Ok(())
        }
    }

    fn file() -> LocalFile {
        LocalFile::from_bytes("cv.pdf", Some("application/pdf"), b"%PDF-1.4".to_vec())
    }

    #[tokio::test]
    async fn grants_endpoint() {
        let channel = Arc::new(CannedChannel {
            reply: json!({"upload_url": "https://storage.example/put", "upload_id": "up_9"}),
            seen: Mutex::new(Vec::new()),
        });
        let negotiator = SessionNegotiator::new(channel.clone(), "profile-form");

        let grant = negotiator.negotiate(&file()).await.unwrap();
        assert_eq!(grant.upload_url, "https://storage.example/put");
        assert_eq!(grant.upload_id.as_deref(), Some("up_9"));

        let seen = channel.seen.lock().unwrap();
        assert_eq!(seen[0].0, "profile-form");
        assert_eq!(seen[0].1, "upload-file");
        assert_eq!(
            seen[0].2,
            json!({"filename": "cv.pdf", "type": "application/pdf"})
        );
    }

    #[tokio::test]
    async fn declined_reply_is_verbatim() {
        let channel = Arc::new(CannedChannel {
            reply: json!({"error": "disk quota exceeded"}),
            seen: Mutex::new(Vec::new()),
        });
        let err = SessionNegotiator::new(channel, "profile-form")
            .negotiate(&file())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Negotiation(ref m) if m == "disk quota exceeded"));
    }

    #[tokio::test]
    async fn malformed_reply_is_channel_error() {
        let channel = Arc::new(CannedChannel {
            reply: json!({"unexpected": true}),
            seen: Mutex::new(Vec::new()),
        });
        let err = SessionNegotiator::new(channel, "profile-form")
            .negotiate(&file())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Channel(_)));
    }
}
