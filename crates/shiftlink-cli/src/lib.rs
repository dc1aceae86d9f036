use anyhow::Context;
use serde::Serialize;
use shiftlink_client::UploadView;
use shiftlink_core::{ClientConfig, SessionState};

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Apply command-line overrides on top of the environment configuration.
pub fn apply_overrides(
    mut config: ClientConfig,
    target: Option<String>,
    chunk_size: Option<u64>,
) -> anyhow::Result<ClientConfig> {
    if let Some(target) = target {
        config.events_target = target;
    }
    if let Some(chunk_size) = chunk_size {
        config.chunk_size = chunk_size;
    }
    config.validate().context("Invalid upload configuration")?;
    Ok(config)
}

/// Final outcome of an upload, as printed by `shiftlink upload`.
#[derive(Debug, Serialize)]
pub struct UploadReport<'a> {
    pub state: SessionState,
    pub upload_id: Option<&'a str>,
    pub bytes_transferred: u64,
    pub view: &'a UploadView,
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}
