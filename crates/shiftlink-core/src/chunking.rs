//! Splitting a file into ordered, contiguous byte ranges.

use crate::error::{UploadError, UploadResult};

/// Half-open byte range `[start, end)` of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: usize,
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `Content-Range` header value for this chunk of a file of `total` bytes.
    pub fn content_range(&self, total: u64) -> String {
        if self.is_empty() {
            format!("bytes */{}", total)
        } else {
            format!("bytes {}-{}/{}", self.start, self.end - 1, total)
        }
    }
}

/// Ordered chunk layout for one file, fixed at session creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    total: u64,
    chunk_size: u64,
    chunks: Vec<ChunkRange>,
}

impl ChunkPlan {
    /// Plan chunks for a file of `total` bytes. A zero-byte file still yields one (empty) chunk.
    pub fn new(total: u64, chunk_size: u64) -> UploadResult<Self> {
        if chunk_size == 0 {
            return Err(UploadError::InvalidInput(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        let chunks = if total == 0 {
            vec![ChunkRange {
                index: 0,
                start: 0,
                end: 0,
            }]
        } else {
            (0..total.div_ceil(chunk_size))
                .map(|i| {
                    let start = i * chunk_size;
                    ChunkRange {
                        index: i as usize,
                        start,
                        end: (start + chunk_size).min(total),
                    }
                })
                .collect()
        };

        Ok(Self {
            total,
            chunk_size,
            chunks,
        })
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn chunks(&self) -> &[ChunkRange] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
