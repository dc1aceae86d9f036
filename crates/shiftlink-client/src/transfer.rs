//! Chunked transfer of a granted session to its signed storage endpoint.
//!
//! Chunks are PUT strictly in order on a spawned task. Outcomes flow back to the
//! owner as [`TransferEvent`]s tagged with the session id; the task holds the only
//! sender, so the owner's receiver closes when the task ends. Once
//! [`TransferHandle::abort`] has been called the task emits nothing further: the
//! cancelled flag is checked before every emission and the in-flight PUT is
//! dropped at its next await point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
use reqwest::Client;
use shiftlink_core::constants::CHUNK_ACK_STATUSES;
use shiftlink_core::{
    ChunkPlan, ChunkRange, LocalFile, ProgressSignal, UploadError, UploadResult, UploadSession,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Destination of chunk PUTs.
#[async_trait]
pub trait ChunkSink: Send + Sync {
    /// PUT one chunk. `Ok` means the endpoint acknowledged it.
    async fn put_chunk(
        &self,
        endpoint: &str,
        range: &ChunkRange,
        total: u64,
        content_type: &str,
        body: Bytes,
    ) -> UploadResult<()>;
}

/// Resumable-upload PUTs over reqwest.
#[derive(Clone, Debug)]
pub struct HttpChunkSink {
    client: Client,
}

impl HttpChunkSink {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        // 308 means "resume incomplete" here, not a redirect.
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChunkSink for HttpChunkSink {
    async fn put_chunk(
        &self,
        endpoint: &str,
        range: &ChunkRange,
        total: u64,
        content_type: &str,
        body: Bytes,
    ) -> UploadResult<()> {
        let response = self
            .client
            .put(endpoint)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, range.len())
            .header(CONTENT_RANGE, range.content_range(total))
            .body(body)
            .send()
            .await
            .map_err(|e| UploadError::Transfer {
                status: e.status().map(|s| s.as_u16()),
                detail: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if CHUNK_ACK_STATUSES.contains(&status) {
            return Ok(());
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(UploadError::Transfer {
            status: Some(status),
            detail,
        })
    }
}

#[derive(Debug)]
pub enum TransferEventKind {
    /// Emitted after every acknowledged chunk except the last
    Progress {
        signal: ProgressSignal,
        acknowledged: u64,
    },
    Error(UploadError),
    Success { bytes_transferred: u64 },
}

#[derive(Debug)]
pub struct TransferEvent {
    pub session_id: Uuid,
    pub kind: TransferEventKind,
}

/// Cancels one running transfer. Dropping the handle aborts it too.
#[derive(Debug)]
pub struct TransferHandle {
    session_id: Uuid,
    cancelled: Arc<AtomicBool>,
    token: CancellationToken,
}

impl TransferHandle {
    /// Stop the transfer. Idempotent.
    pub fn abort(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            debug!(session_id = %self.session_id, "Transfer aborted");
        }
        self.token.cancel();
    }
}

impl Drop for TransferHandle {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.token.cancel();
    }
}

/// Spawns one transfer task per session.
#[derive(Clone)]
pub struct TransferDriver {
    sink: Arc<dyn ChunkSink>,
    chunk_size: u64,
}

impl TransferDriver {
    pub fn new(sink: Arc<dyn ChunkSink>, chunk_size: u64) -> Self {
        Self { sink, chunk_size }
    }

    /// Start transferring `session`'s file. Events for it are sent on `events`.
    pub fn spawn(
        &self,
        session: &UploadSession,
        events: mpsc::UnboundedSender<TransferEvent>,
    ) -> UploadResult<TransferHandle> {
        let file = session.file().clone();
        let plan = ChunkPlan::new(file.size(), self.chunk_size)?;
        let session_id = session.id();
        let cancelled = Arc::new(AtomicBool::new(false));
        let token = CancellationToken::new();

        info!(
            session_id = %session_id,
            filename = %file.name(),
            size = file.size(),
            chunks = plan.len(),
            "Starting chunked transfer"
        );

        let emitter = Emitter {
            session_id,
            cancelled: cancelled.clone(),
            tx: events,
        };
        tokio::spawn(run_transfer(
            self.sink.clone(),
            file,
            session.endpoint_url().to_string(),
            plan,
            emitter,
            token.clone(),
        ));

        Ok(TransferHandle {
            session_id,
            cancelled,
            token,
        })
    }
}

struct Emitter {
    session_id: Uuid,
    cancelled: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<TransferEvent>,
}

impl Emitter {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn emit(&self, kind: TransferEventKind) {
        if self.is_cancelled() {
            return;
        }
        // The receiver is gone when the owner was dropped; nothing left to notify.
        let _ = self.tx.send(TransferEvent {
            session_id: self.session_id,
            kind,
        });
    }
}

async fn run_transfer(
    sink: Arc<dyn ChunkSink>,
    file: LocalFile,
    endpoint: String,
    plan: ChunkPlan,
    emitter: Emitter,
    token: CancellationToken,
) {
    let total = plan.total();
    let last = plan.len().saturating_sub(1);
    let mut acknowledged = 0u64;

    for range in plan.chunks() {
        if emitter.is_cancelled() {
            return;
        }

        let body = match file.read_range(range).await {
            Ok(body) => body,
            Err(err) => {
                warn!(session_id = %emitter.session_id, error = %err, "Failed to read chunk");
                emitter.emit(TransferEventKind::Error(err));
                return;
            }
        };

        let result = tokio::select! {
            _ = token.cancelled() => return,
            result = sink.put_chunk(&endpoint, range, total, file.mime_type(), body) => result,
        };

        match result {
            Ok(()) => {
                acknowledged += range.len();
                debug!(
                    session_id = %emitter.session_id,
                    chunk = range.index,
                    acknowledged,
                    total,
                    "Chunk acknowledged"
                );
                if range.index < last {
                    emitter.emit(TransferEventKind::Progress {
                        signal: ProgressSignal::from_bytes(acknowledged, total),
                        acknowledged,
                    });
                }
            }
            Err(err) => {
                warn!(
                    session_id = %emitter.session_id,
                    chunk = range.index,
                    error = %err,
                    "Chunk upload failed"
                );
                emitter.emit(TransferEventKind::Error(err));
                return;
            }
        }
    }

    emitter.emit(TransferEventKind::Success {
        bytes_transferred: acknowledged,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        puts: Mutex<Vec<(String, u64)>>,
        fail_at: Option<usize>,
    }

    #[async_trait]
    impl ChunkSink for RecordingSink {
        async fn put_chunk(
            &self,
            _endpoint: &str,
            range: &ChunkRange,
            total: u64,
            _content_type: &str,
            body: Bytes,
        ) -> UploadResult<()> {
            if self.fail_at == Some(range.index) {
                return Err(UploadError::Transfer {
                    status: Some(500),
                    detail: "boom".to_string(),
                });
            }
            self.puts
                .lock()
                .unwrap()
                .push((range.content_range(total), body.len() as u64));
            Ok(())
        }
    }

    fn session(size: usize) -> UploadSession {
        let file = LocalFile::from_bytes("clip.mp4", Some("video/mp4"), vec![7u8; size]);
        let mut session =
            UploadSession::new(file, "https://storage.example/put".to_string(), None);
        session.start().unwrap();
        session
    }

    async fn collect(mut rx: mpsc::UnboundedReceiver<TransferEvent>) -> Vec<TransferEventKind> {
        let mut out = Vec::new();
        while let Some(event) = rx.recv().await {
            out.push(event.kind);
        }
        out
    }

    #[tokio::test]
    async fn chunks_cover_the_file() {
        let sink = Arc::new(RecordingSink::default());
        let driver = TransferDriver::new(sink.clone(), 10);
        let (tx, rx) = mpsc::unbounded_channel();

        let _handle = driver.spawn(&session(25), tx).unwrap();
        let events = collect(rx).await;

        let puts = sink.puts.lock().unwrap();
        assert_eq!(
            puts.iter().map(|p| p.0.as_str()).collect::<Vec<_>>(),
            ["bytes 0-9/25", "bytes 10-19/25", "bytes 20-24/25"]
        );
        assert_eq!(puts.iter().map(|p| p.1).sum::<u64>(), 25);

        let percents: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                TransferEventKind::Progress { signal, .. } => Some(signal.percent()),
                _ => None,
            })
            .collect();
        assert_eq!(percents, [40, 80]);
        assert!(matches!(
            events.last(),
            Some(TransferEventKind::Success {
                bytes_transferred: 25
            })
        ));
    }

    #[tokio::test]
    async fn single_chunk_has_no_progress() {
        let sink = Arc::new(RecordingSink::default());
        let driver = TransferDriver::new(sink.clone(), 30_720);
        let (tx, rx) = mpsc::unbounded_channel();

        let _handle = driver.spawn(&session(100), tx).unwrap();
        let events = collect(rx).await;

        assert_eq!(sink.puts.lock().unwrap().len(), 1);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TransferEventKind::Success { .. }));
    }

    #[tokio::test]
    async fn empty_file_sends_one_empty_chunk() {
        let sink = Arc::new(RecordingSink::default());
        let driver = TransferDriver::new(sink.clone(), 10);
        let (tx, rx) = mpsc::unbounded_channel();

        let _handle = driver.spawn(&session(0), tx).unwrap();
        let events = collect(rx).await;

        assert_eq!(*sink.puts.lock().unwrap(), [("bytes */0".to_string(), 0)]);
        assert!(matches!(
            events[..],
            [TransferEventKind::Success {
                bytes_transferred: 0
            }]
        ));
    }

    #[tokio::test]
    async fn failure_stops_the_transfer() {
        let sink = Arc::new(RecordingSink {
            fail_at: Some(1),
            ..Default::default()
        });
        let driver = TransferDriver::new(sink.clone(), 10);
        let (tx, rx) = mpsc::unbounded_channel();

        let _handle = driver.spawn(&session(40), tx).unwrap();
        let events = collect(rx).await;

        assert_eq!(sink.puts.lock().unwrap().len(), 1);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], TransferEventKind::Progress { .. }));
        assert!(matches!(
            events[1],
            TransferEventKind::Error(UploadError::Transfer {
                status: Some(500),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn abort_before_start_emits_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let driver = TransferDriver::new(sink.clone(), 10);
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = driver.spawn(&session(40), tx).unwrap();
        handle.abort();
        handle.abort();

        assert!(collect(rx).await.is_empty());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let driver = TransferDriver::new(Arc::new(RecordingSink::default()), 0);
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(matches!(
            driver.spawn(&session(10), tx),
            Err(UploadError::InvalidInput(_))
        ));
    }
}
