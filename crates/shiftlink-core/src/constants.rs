//! Shared constants for the upload flow and form widgets.

/// Chunk size used by every upload field (30 KiB).
pub const DEFAULT_CHUNK_SIZE: u64 = 30_720;

/// Event asking the server for a signed upload URL.
pub const EVENT_REQUEST_UPLOAD: &str = "upload-file";

/// Fire-and-forget notification sent once every chunk is acknowledged.
pub const EVENT_UPLOAD_COMPLETED: &str = "upload-completed";

/// Re-enables the form's submit control after a failure.
pub const EVENT_ENABLE_SUBMIT: &str = "enable-submit";

/// Sent when the user removes an uploaded file.
pub const EVENT_DELETE_FILE: &str = "delete_file";

/// Server push: the uploaded video is being transcoded.
pub const PUSH_VIDEO_PROCESSING: &str = "video-processing";

/// Server push: transcoding finished.
pub const PUSH_VIDEO_READY: &str = "video-ready";

/// Label shown for transfer failures. Server negotiation errors are shown verbatim instead.
pub const TRANSFER_FAILED_MESSAGE: &str = "An error has occurred, please try again";

/// Label shown once the transfer succeeds.
pub const COMPLETED_LABEL: &str = "Completed";

/// Fallback MIME type when neither the caller nor content sniffing knows better.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Default calling code for phone fields.
pub const DEFAULT_COUNTRY_CODE: &str = "+41";

/// HTTP statuses that acknowledge a chunk PUT. 308 is "resume incomplete".
pub const CHUNK_ACK_STATUSES: [u16; 5] = [200, 201, 204, 206, 308];

/// Default request timeout for the event channel.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Radius of the circular progress indicator, in SVG user units.
pub const PROGRESS_RING_RADIUS: f64 = 16.0;
