//! Shiftlink Core Library
//!
//! Domain models, error types, configuration and the pure view-model logic
//! shared by the upload client and the CLI. Nothing in here performs network
//! I/O; the `shiftlink-client` crate drives these types against a server.

pub mod chunking;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod dropzone;
pub mod error;
pub mod events;
pub mod models;
pub mod phone;
pub mod projection;
pub mod render;
pub mod search;
pub mod tags;
pub mod text;

// Re-export commonly used types
pub use chunking::{ChunkPlan, ChunkRange};
pub use config::{AuthMode, ClientConfig};
pub use dataset::Dataset;
pub use dropzone::{Dropzone, DropzoneInput, DropzoneOutput, DropzoneState};
pub use error::{ErrorMetadata, LogLevel, UploadError, UploadResult};
pub use events::EventBus;
pub use models::{
    LocalFile, NegotiationReply, ProgressSignal, ServerPush, SessionState, UploadCompleted,
    UploadGrant, UploadRequest, UploadSession,
};
pub use projection::{file_size_si, ProgressView, Tone};
