//! Element data attributes as typed configuration.
//!
//! Server-rendered markup hands each widget its localized strings, target ids and
//! numeric limits through `data-*` attributes. A [`Dataset`] is read once when the
//! widget is constructed; consumers pull typed values out of it and never query it
//! again.

use std::collections::HashMap;

use crate::error::{UploadError, UploadResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    values: HashMap<String, String>,
}

impl Dataset {
    /// Keys may be given as `data-max-pages`, `max-pages` or `maxPages`; all normalise to `max-pages`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (normalize_key(k.as_ref()), v.into()))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    pub fn require(&self, key: &str) -> UploadResult<&str> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| UploadError::Config(format!("missing data attribute `{}`", key)))
    }

    /// Leading integer of the value; missing, unparseable and zero values yield `default`.
    pub fn positive_or(&self, key: &str, default: usize) -> usize {
        self.get(key)
            .map(|v| {
                v.trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
            })
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(default)
    }
}

fn normalize_key(key: &str) -> String {
    let key = key.strip_prefix("data-").unwrap_or(key);
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

/// Configuration of an upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFieldConfig {
    /// Server-side scope receiving the field's events
    pub events_target: String,
}

impl UploadFieldConfig {
    pub fn from_dataset(dataset: &Dataset) -> UploadResult<Self> {
        Ok(Self {
            events_target: dataset.require("events-target")?.to_string(),
        })
    }
}
