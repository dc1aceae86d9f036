pub mod file;
pub mod negotiation;
pub mod progress;
pub mod session;

pub use file::{FileSource, LocalFile};
pub use negotiation::{NegotiationReply, ServerPush, UploadCompleted, UploadGrant, UploadRequest};
pub use progress::ProgressSignal;
pub use session::{SessionState, UploadSession};
