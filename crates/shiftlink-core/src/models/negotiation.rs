//! Wire payloads exchanged with the server over the event channel.

use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// Payload of the "request upload" event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadRequest {
    pub filename: String,
    /// MIME type
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Signed endpoint granted by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrant {
    pub upload_url: String,
    pub upload_id: Option<String>,
}

/// Reply to the "request upload" event. Video fields reply with `url`/`id`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NegotiationReply {
    Declined {
        error: String,
    },
    Granted {
        #[serde(alias = "url")]
        upload_url: String,
        #[serde(default, alias = "id")]
        upload_id: Option<String>,
    },
}

impl NegotiationReply {
    pub fn into_grant(self) -> Result<UploadGrant, UploadError> {
        match self {
            NegotiationReply::Declined { error } => Err(UploadError::Negotiation(error)),
            NegotiationReply::Granted {
                upload_url,
                upload_id,
            } => Ok(UploadGrant {
                upload_url,
                upload_id,
            }),
        }
    }
}

/// Payload of the "upload completed" notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadCompleted {
    pub upload_id: String,
}

/// Events the server pushes after the upload, while it post-processes the asset.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ServerPush {
    VideoProcessing,
    VideoReady {
        asset_id: Option<String>,
        playback_id: Option<String>,
    },
}
