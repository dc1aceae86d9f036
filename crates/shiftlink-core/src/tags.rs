//! Tag input backed by a comma-separated hidden value.

/// Ordered, de-duplicated tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<String>,
}

impl TagList {
    /// Parse the hidden input's value. Blank entries are skipped.
    pub fn from_hidden(value: &str) -> Self {
        let mut list = Self::default();
        for tag in value.split(',') {
            list.add(tag);
        }
        list
    }

    /// Value written back to the hidden input.
    pub fn to_hidden(&self) -> String {
        self.tags.join(",")
    }

    /// Add a trimmed tag. Returns false for blanks and duplicates.
    pub fn add(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.tags.iter().any(|t| t == value) {
            return false;
        }
        self.tags.push(value.to_string());
        true
    }

    pub fn remove(&mut self, value: &str) -> bool {
        match self.tags.iter().position(|t| t == value) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    /// Backspace in an empty input removes the last tag.
    pub fn backspace(&mut self, input: &str) -> Option<String> {
        if input.is_empty() {
            self.tags.pop()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
