//! Document preview: failure classification and thumbnail layout.

use serde::Serialize;

use crate::dataset::Dataset;

/// Categories of preview failures shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderErrorKind {
    InvalidFile,
    NotFound,
    LoadingError,
    Timeout,
    ServiceUnavailable,
    Generic,
}

/// Classify a renderer failure by its exception name and message. First match wins.
pub fn classify_render_failure(name: Option<&str>, message: &str) -> RenderErrorKind {
    match name {
        Some("InvalidPDFException") => return RenderErrorKind::InvalidFile,
        Some("MissingPDFException") => return RenderErrorKind::NotFound,
        _ => {}
    }
    if message.contains("404") {
        RenderErrorKind::NotFound
    } else if message.contains("worker") {
        RenderErrorKind::LoadingError
    } else if message.contains("timeout") {
        RenderErrorKind::Timeout
    } else if message.contains("PDF viewer unavailable") {
        RenderErrorKind::ServiceUnavailable
    } else {
        RenderErrorKind::Generic
    }
}

/// Localized headline and detail per failure kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderMessages {
    pub preview_unavailable: String,
    pub details_unavailable: String,
    pub invalid_file: String,
    pub file_corrupted: String,
    pub not_found: String,
    pub file_not_loaded: String,
    pub loading_error: String,
    pub viewer_unavailable: String,
    pub loading_timeout: String,
    pub timeout_details: String,
    pub service_unavailable: String,
    pub viewer_not_loaded: String,
}

impl Default for RenderMessages {
    fn default() -> Self {
        Self::from_dataset(&Dataset::default())
    }
}

impl RenderMessages {
    pub fn from_dataset(ds: &Dataset) -> Self {
        Self {
            preview_unavailable: ds.get_or("error-preview-unavailable", "Preview unavailable"),
            details_unavailable: ds
                .get_or("error-details-unavailable", "Unable to load PDF preview"),
            invalid_file: ds.get_or("error-invalid-pdf", "Invalid PDF file"),
            file_corrupted: ds.get_or("error-file-corrupted", "The file appears to be corrupted"),
            not_found: ds.get_or("error-not-found", "PDF not found"),
            file_not_loaded: ds.get_or("error-file-not-loaded", "The file could not be loaded"),
            loading_error: ds.get_or("error-loading", "Loading error"),
            viewer_unavailable: ds
                .get_or("error-viewer-unavailable", "PDF viewer temporarily unavailable"),
            loading_timeout: ds.get_or("error-timeout", "Loading timeout"),
            timeout_details: ds
                .get_or("error-timeout-details", "The PDF is taking too long to load"),
            service_unavailable: ds.get_or("error-service-unavailable", "Service unavailable"),
            viewer_not_loaded: ds
                .get_or("error-viewer-not-loaded", "PDF viewer could not be loaded"),
        }
    }

    pub fn headline(&self, kind: RenderErrorKind) -> &str {
        match kind {
            RenderErrorKind::InvalidFile => &self.invalid_file,
            RenderErrorKind::NotFound => &self.not_found,
            RenderErrorKind::LoadingError => &self.loading_error,
            RenderErrorKind::Timeout => &self.loading_timeout,
            RenderErrorKind::ServiceUnavailable => &self.service_unavailable,
            RenderErrorKind::Generic => &self.preview_unavailable,
        }
    }

    pub fn detail(&self, kind: RenderErrorKind) -> &str {
        match kind {
            RenderErrorKind::InvalidFile => &self.file_corrupted,
            RenderErrorKind::NotFound => &self.file_not_loaded,
            RenderErrorKind::LoadingError => &self.viewer_unavailable,
            RenderErrorKind::Timeout => &self.timeout_details,
            RenderErrorKind::ServiceUnavailable => &self.viewer_not_loaded,
            RenderErrorKind::Generic => &self.details_unavailable,
        }
    }
}

const DEFAULT_MAX_PAGES: usize = 4;
/// Documents this short always show every page.
const SHOW_ALL_PAGES_UP_TO: usize = 3;

/// Thumbnail strip layout for a container width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLayout {
    pub max_pages: usize,
    pub thumbnail_height: u32,
}

impl PreviewLayout {
    pub fn for_width(container_width: u32) -> Self {
        if container_width < 480 {
            Self {
                max_pages: 3,
                thumbnail_height: 100,
            }
        } else {
            Self {
                max_pages: 4,
                thumbnail_height: 120,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    pub max_pages: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl PreviewConfig {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            max_pages: dataset.positive_or("max-pages", DEFAULT_MAX_PAGES),
        }
    }
}

/// Pages to render, or `InvalidFile` for an empty document. `config.max_pages`
/// caps the layout's own limit.
pub fn pages_to_render(
    num_pages: usize,
    layout: PreviewLayout,
    config: &PreviewConfig,
) -> Result<usize, RenderErrorKind> {
    if num_pages == 0 {
        return Err(RenderErrorKind::InvalidFile);
    }
    if num_pages <= SHOW_ALL_PAGES_UP_TO {
        return Ok(num_pages);
    }
    Ok(num_pages.min(layout.max_pages).min(config.max_pages))
}
