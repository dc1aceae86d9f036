//! "Read more" text truncation.

use crate::dataset::Dataset;

const DEFAULT_TRUNCATE_LENGTH: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncateConfig {
    pub max_len: usize,
    pub read_more: String,
    pub read_less: String,
}

impl TruncateConfig {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            max_len: dataset.positive_or("truncate-length", DEFAULT_TRUNCATE_LENGTH),
            read_more: dataset.get_or("read-more-text", "Read More"),
            read_less: dataset.get_or("read-less-text", "Read Less"),
        }
    }
}

/// Cut `text` to `max_len` characters, drop a trailing partial word and append `...`.
/// Returns `None` when the text already fits.
pub fn truncate_words(text: &str, max_len: usize) -> Option<String> {
    if text.chars().count() <= max_len {
        return None;
    }
    let head: String = text.chars().take(max_len).collect();
    let trimmed = head.trim_end_matches(|c: char| c.is_alphanumeric() || c == '_');
    Some(format!("{}...", trimmed))
}
