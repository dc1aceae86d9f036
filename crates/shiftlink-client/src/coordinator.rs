//! Upload coordinator: one upload trigger with its status panel.
//!
//! Owns at most one [`UploadSession`], its [`TransferHandle`] and the receiving end
//! of that session's transfer events. Replacing or cancelling the session drops
//! the receiver, so nothing from an old transfer reaches the view. Every view
//! change is published on the coordinator's [`EventBus`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use shiftlink_core::constants::{EVENT_DELETE_FILE, EVENT_ENABLE_SUBMIT, EVENT_UPLOAD_COMPLETED};
use shiftlink_core::{
    file_size_si, ClientConfig, Dropzone, DropzoneInput, DropzoneOutput, ErrorMetadata, EventBus,
    LocalFile, LogLevel, ProgressView, ServerPush, SessionState, UploadCompleted, UploadError,
    UploadResult, UploadSession,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::channel::EventChannel;
use crate::negotiator::SessionNegotiator;
use crate::transfer::{
    HttpChunkSink, TransferDriver, TransferEvent, TransferEventKind, TransferHandle,
};
use crate::ApiClient;

/// Which part of the status panel is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    Hidden,
    Requesting,
    Transferring,
    Failed,
    Completed,
    /// Uploaded; the server is post-processing (transcoding) the asset
    Processing,
    Ready,
}

/// Status panel slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadView {
    pub phase: UploadPhase,
    pub filename: Option<String>,
    pub size_label: Option<String>,
    pub progress: ProgressView,
    /// Failure message, when `phase` is `Failed`
    pub message: Option<String>,
    pub playback_id: Option<String>,
}

impl Default for UploadView {
    fn default() -> Self {
        Self {
            phase: UploadPhase::Hidden,
            filename: None,
            size_label: None,
            progress: ProgressView::idle(),
            message: None,
            playback_id: None,
        }
    }
}

/// Published after every view change.
#[derive(Debug, Clone)]
pub struct UploadNotice {
    pub session_id: Option<Uuid>,
    pub view: UploadView,
}

struct ActiveUpload {
    session: UploadSession,
    handle: Option<TransferHandle>,
    events: mpsc::UnboundedReceiver<TransferEvent>,
}

pub struct UploadCoordinator {
    channel: Arc<dyn EventChannel>,
    negotiator: SessionNegotiator,
    driver: TransferDriver,
    target: String,
    dropzone: Dropzone,
    view: UploadView,
    active: Option<ActiveUpload>,
    notices: EventBus<UploadNotice>,
}

impl UploadCoordinator {
    pub fn new(
        channel: Arc<dyn EventChannel>,
        driver: TransferDriver,
        events_target: impl Into<String>,
    ) -> Self {
        let target = events_target.into();
        Self {
            negotiator: SessionNegotiator::new(channel.clone(), target.clone()),
            channel,
            driver,
            target,
            dropzone: Dropzone::new(),
            view: UploadView::default(),
            active: None,
            notices: EventBus::new(),
        }
    }

    /// HTTP event channel and HTTP chunk sink built from `config`.
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = ApiClient::from_config(config)?;
        debug!(
            base_url = %client.base_url(),
            target_scope = %config.events_target,
            chunk_size = config.chunk_size,
            "Upload coordinator configured"
        );
        let sink = HttpChunkSink::new(Duration::from_secs(config.request_timeout_secs))?;
        let driver = TransferDriver::new(Arc::new(sink), config.chunk_size);
        Ok(Self::new(Arc::new(client), driver, config.events_target.clone()))
    }

    pub fn view(&self) -> &UploadView {
        &self.view
    }

    /// Receiver for every view change from now on. Drop it to unsubscribe.
    pub fn notices(&self) -> broadcast::Receiver<UploadNotice> {
        self.notices.subscribe()
    }

    pub fn session(&self) -> Option<&UploadSession> {
        self.active.as_ref().map(|a| &a.session)
    }

    /// Whether a transfer is running.
    pub fn is_transferring(&self) -> bool {
        self.session()
            .is_some_and(|s| s.state() == SessionState::InProgress)
    }

    /// Feed a drop zone / picker input; an accepted file starts an upload.
    pub async fn handle_input(
        &mut self,
        input: DropzoneInput<LocalFile>,
    ) -> (DropzoneOutput<()>, Option<UploadResult<Uuid>>) {
        let DropzoneOutput {
            state,
            highlight,
            prevent_default,
            accepted,
        } = self.dropzone.handle(input);
        let started = match accepted {
            Some(file) => Some(self.begin(file).await),
            None => None,
        };
        let output = DropzoneOutput {
            state,
            highlight,
            prevent_default,
            accepted: started.as_ref().map(|_| ()),
        };
        (output, started)
    }

    /// Negotiate an endpoint for `file` and start transferring it. Any upload
    /// already in progress is aborted first.
    pub async fn begin(&mut self, file: LocalFile) -> UploadResult<Uuid> {
        self.abort_active();
        self.active = None;

        info!(
            target_scope = %self.target,
            filename = %file.name(),
            size = file.size(),
            "Upload requested"
        );
        self.view = UploadView {
            phase: UploadPhase::Requesting,
            filename: Some(file.name().to_string()),
            size_label: Some(file_size_si(file.size())),
            ..UploadView::default()
        };
        self.publish(None);

        let grant = match self.negotiator.negotiate(&file).await {
            Ok(grant) => grant,
            Err(err) => {
                self.show_failure(None, &err).await;
                return Err(err);
            }
        };

        let mut session = UploadSession::new(file, grant.upload_url, grant.upload_id);
        let session_id = session.id();
        session.start()?;

        let (events_tx, events) = mpsc::unbounded_channel();
        let handle = match self.driver.spawn(&session, events_tx) {
            Ok(handle) => handle,
            Err(err) => {
                session.fail()?;
                self.active = Some(ActiveUpload {
                    session,
                    handle: None,
                    events,
                });
                self.show_failure(Some(session_id), &err).await;
                return Err(err);
            }
        };

        self.active = Some(ActiveUpload {
            session,
            handle: Some(handle),
            events,
        });
        self.view.phase = UploadPhase::Transferring;
        self.publish(Some(session_id));
        Ok(session_id)
    }

    /// Wait for and apply the next transfer event of the active session.
    /// Returns the session state afterwards, or `None` when nothing is transferring.
    pub async fn next_event(&mut self) -> Option<SessionState> {
        let active = self.active.as_mut()?;
        if active.session.state() != SessionState::InProgress {
            return None;
        }

        // The transfer task owns the only sender; a closed channel with the
        // session still in progress means the task died without an outcome.
        let kind = match active.events.recv().await {
            Some(event) => event.kind,
            None => TransferEventKind::Error(UploadError::Transfer {
                status: None,
                detail: "Transfer task ended without an outcome".to_string(),
            }),
        };
        Some(self.apply(kind).await)
    }

    /// `begin` and then pump events until the session is terminal.
    pub async fn run(&mut self, file: LocalFile) -> UploadResult<SessionState> {
        self.begin(file).await?;
        while let Some(state) = self.next_event().await {
            if state.is_terminal() {
                return Ok(state);
            }
        }
        Ok(self
            .session()
            .map(UploadSession::state)
            .unwrap_or(SessionState::Aborted))
    }

    /// Abort the running transfer and hide the panel. Returns whether anything was aborted.
    pub fn cancel(&mut self) -> bool {
        let aborted = self.abort_active();
        if aborted {
            self.view = UploadView::default();
            self.publish(None);
        }
        aborted
    }

    /// Remove the uploaded (or uploading) file and tell the server.
    pub async fn delete(&mut self) {
        self.cancel();
        self.active = None;
        if self.view.phase != UploadPhase::Hidden {
            self.view = UploadView::default();
            self.publish(None);
        }
        self.push(EVENT_DELETE_FILE, json!({})).await;
    }

    /// Apply a post-processing push from the server. Only a completed upload has
    /// an asset to process; pushes arriving in any other state are ignored.
    pub fn handle_server_push(&mut self, push: ServerPush) {
        let session_id = match self.session() {
            Some(session) if session.state() == SessionState::Completed => session.id(),
            other => {
                debug!(
                    state = ?other.map(UploadSession::state),
                    push = ?push,
                    "Ignoring server push without a completed upload"
                );
                return;
            }
        };
        match push {
            ServerPush::VideoProcessing => {
                debug!(session_id = %session_id, "Asset processing");
                self.view.phase = UploadPhase::Processing;
            }
            ServerPush::VideoReady { playback_id, .. } => {
                info!(session_id = %session_id, playback_id = ?playback_id, "Asset ready");
                self.view.phase = UploadPhase::Ready;
                self.view.progress = ProgressView::completed();
                self.view.playback_id = playback_id;
            }
        }
        self.publish(Some(session_id));
    }

    async fn apply(&mut self, kind: TransferEventKind) -> SessionState {
        let Some(active) = self.active.as_mut() else {
            return SessionState::Aborted;
        };
        let session_id = active.session.id();

        match kind {
            TransferEventKind::Progress {
                signal,
                acknowledged,
            } => {
                active.session.record_progress(acknowledged);
                self.view.progress = ProgressView::project(signal);
                self.publish(Some(session_id));
            }
            TransferEventKind::Error(err) => {
                self.fail_active(err).await;
            }
            TransferEventKind::Success { bytes_transferred } => {
                match active.session.complete(bytes_transferred) {
                    Ok(()) => {
                        info!(
                            session_id = %session_id,
                            bytes_transferred,
                            "Upload completed"
                        );
                        active.handle = None;
                        let payload = match active.session.tracking_id() {
                            Some(upload_id) => serde_json::to_value(UploadCompleted {
                                upload_id: upload_id.to_string(),
                            })
                            .unwrap_or_else(|_| json!({})),
                            None => json!({}),
                        };
                        self.view.phase = UploadPhase::Completed;
                        self.view.progress = ProgressView::completed();
                        self.view.message = None;
                        self.publish(Some(session_id));
                        self.push(EVENT_UPLOAD_COMPLETED, payload).await;
                    }
                    Err(err) => self.fail_active(err).await,
                }
            }
        }

        self.session()
            .map(UploadSession::state)
            .unwrap_or(SessionState::Aborted)
    }

    async fn fail_active(&mut self, err: UploadError) {
        let session_id = match self.active.as_mut() {
            Some(active) => {
                active.handle = None;
                if let Err(transition) = active.session.fail() {
                    warn!(error = %transition, "Session already terminal");
                }
                Some(active.session.id())
            }
            None => None,
        };
        self.show_failure(session_id, &err).await;
    }

    async fn show_failure(&mut self, session_id: Option<Uuid>, err: &UploadError) {
        log_failure(session_id, err);
        let message = err.client_message();
        self.view.phase = UploadPhase::Failed;
        self.view.progress = self.view.progress.failed(message.clone());
        self.view.message = Some(message);
        self.publish(session_id);
        self.push(EVENT_ENABLE_SUBMIT, json!({})).await;
    }

    fn abort_active(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if let Some(handle) = active.handle.take() {
            handle.abort();
        }
        if active.session.state().is_terminal() {
            return false;
        }
        match active.session.abort() {
            Ok(()) => {
                info!(session_id = %active.session.id(), "Upload cancelled");
                true
            }
            Err(err) => {
                warn!(error = %err, "Failed to abort session");
                false
            }
        }
    }

    async fn push(&self, event: &str, payload: Value) {
        if let Err(err) = self.channel.push(&self.target, event, payload).await {
            warn!(
                target_scope = %self.target,
                event,
                error = %err,
                "Failed to push event"
            );
        }
    }

    fn publish(&self, session_id: Option<Uuid>) {
        self.notices.publish(UploadNotice {
            session_id,
            view: self.view.clone(),
        });
    }
}

fn log_failure(session_id: Option<Uuid>, err: &UploadError) {
    let error_type = err.error_type();
    let error_code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => {
            debug!(session_id = ?session_id, error = %err, error_type, error_code, "Upload failed");
        }
        LogLevel::Warn => {
            warn!(session_id = ?session_id, error = %err, error_type, error_code, "Upload failed");
        }
        LogLevel::Error => {
            error!(session_id = ?session_id, error = %err, error_type, error_code, "Upload failed");
        }
    }
}
