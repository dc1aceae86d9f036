use serde::Serialize;
use uuid::Uuid;

use super::file::LocalFile;
use crate::error::{UploadError, UploadResult};

/// Lifecycle of one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Pending,
    InProgress,
    Completed,
    Failed,
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Failed | SessionState::Aborted
        )
    }

    fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Failed)
                | (Pending, Aborted)
                | (InProgress, Completed)
                | (InProgress, Failed)
                | (InProgress, Aborted)
        )
    }
}

/// A granted upload: the local file plus the signed endpoint the server issued for it.
#[derive(Debug, Clone)]
pub struct UploadSession {
    id: Uuid,
    file: LocalFile,
    tracking_id: Option<String>,
    endpoint_url: String,
    state: SessionState,
    bytes_transferred: u64,
}

impl UploadSession {
    pub fn new(file: LocalFile, endpoint_url: String, tracking_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            tracking_id,
            endpoint_url,
            state: SessionState::Pending,
            bytes_transferred: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file(&self) -> &LocalFile {
        &self.file
    }

    pub fn tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    fn transition(&mut self, next: SessionState) -> UploadResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(UploadError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn start(&mut self) -> UploadResult<()> {
        self.transition(SessionState::InProgress)
    }

    /// Record acknowledged bytes. Ignored once the session is terminal.
    pub fn record_progress(&mut self, acknowledged: u64) {
        if self.state == SessionState::InProgress {
            self.bytes_transferred = acknowledged.min(self.file.size());
        }
    }

    /// Mark the session completed. The acknowledged byte count must equal the file size.
    pub fn complete(&mut self, bytes_transferred: u64) -> UploadResult<()> {
        if bytes_transferred != self.file.size() {
            return Err(UploadError::IncompleteTransfer {
                expected: self.file.size(),
                transferred: bytes_transferred,
            });
        }
        self.transition(SessionState::Completed)?;
        self.bytes_transferred = bytes_transferred;
        Ok(())
    }

    pub fn fail(&mut self) -> UploadResult<()> {
        self.transition(SessionState::Failed)
    }

    pub fn abort(&mut self) -> UploadResult<()> {
        self.transition(SessionState::Aborted)
    }
}
