//! shiftlink CLI: drive an upload against a running server and try the form helpers.
//!
//! Reads SHIFTLINK_API_URL (or API_URL), SHIFTLINK_API_KEY (or API_KEY),
//! SHIFTLINK_AUTH and SHIFTLINK_EVENTS_TARGET from the environment or a `.env` file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shiftlink_cli::{apply_overrides, init_tracing, print_json, UploadReport};
use shiftlink_client::UploadCoordinator;
use shiftlink_core::phone::PhoneField;
use shiftlink_core::text::truncate_words;
use shiftlink_core::{file_size_si, ClientConfig, LocalFile};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "shiftlink", about = "shiftlink upload client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Negotiate an endpoint for a file and upload it in chunks
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Server-side scope receiving the upload events
        #[arg(long)]
        target: Option<String>,
        /// Chunk size in bytes
        #[arg(long)]
        chunk_size: Option<u64>,
        /// MIME type (sniffed from the content when omitted)
        #[arg(long)]
        mime_type: Option<String>,
    },
    /// Format a phone number the way the phone field submits it
    Phone {
        /// Digits as typed
        digits: String,
        /// Calling code
        #[arg(long, default_value = "+41")]
        code: String,
    },
    /// Human-readable file size
    Size {
        bytes: u64,
    },
    /// Truncate text at a word boundary
    Truncate {
        text: String,
        #[arg(long, default_value = "150")]
        max_len: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            target,
            chunk_size,
            mime_type,
        } => {
            let config = ClientConfig::from_env().context(
                "Failed to load configuration. Set SHIFTLINK_API_URL and SHIFTLINK_API_KEY",
            )?;
            let config = apply_overrides(config, target, chunk_size)?;

            let file = LocalFile::from_path(&file, mime_type.as_deref())
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;

            let mut coordinator = UploadCoordinator::from_config(&config)?;
            let mut notices = coordinator.notices();
            let status_logger = tokio::spawn(async move {
                loop {
                    match notices.recv().await {
                        Ok(notice) => info!(
                            phase = ?notice.view.phase,
                            progress = %notice.view.progress.label,
                            "Upload status"
                        ),
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Status logger fell behind")
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            let state = coordinator
                .run(file)
                .await
                .context("Upload could not be started")?;

            let session = coordinator.session();
            print_json(&UploadReport {
                state,
                upload_id: session.and_then(|s| s.tracking_id()),
                bytes_transferred: session.map(|s| s.bytes_transferred()).unwrap_or(0),
                view: coordinator.view(),
            })?;

            // Closing the bus lets the logger drain what is left and exit.
            drop(coordinator);
            status_logger.await.context("Status logger panicked")?;
        }
        Commands::Phone { digits, code } => {
            let field = PhoneField::with_code(&code);
            print_json(&field.commit(&digits))?;
        }
        Commands::Size { bytes } => {
            print_json(&serde_json::json!({ "bytes": bytes, "label": file_size_si(bytes) }))?;
        }
        Commands::Truncate { text, max_len } => {
            let truncated = truncate_words(&text, max_len);
            print_json(&serde_json::json!({
                "truncated": truncated.is_some(),
                "text": truncated.unwrap_or(text),
            }))?;
        }
    }

    Ok(())
}
