use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::chunking::ChunkRange;
use crate::constants::DEFAULT_MIME_TYPE;
use crate::error::{UploadError, UploadResult};

/// Bytes read from the head of a file for content sniffing.
const SNIFF_LEN: usize = 8192;

/// Where a file's bytes live.
#[derive(Debug, Clone)]
pub enum FileSource {
    Memory(Bytes),
    Path(PathBuf),
}

/// Opaque handle to the file a user picked or dropped.
///
/// Only the name, size and MIME type are visible to the rest of the flow; bytes are
/// read one chunk at a time through [`LocalFile::read_range`].
#[derive(Debug, Clone)]
pub struct LocalFile {
    name: String,
    size: u64,
    mime_type: String,
    source: FileSource,
}

impl LocalFile {
    /// Wrap an in-memory buffer. The MIME type is sniffed when not given.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        let mime_type = mime_type
            .map(str::to_string)
            .unwrap_or_else(|| sniff_mime(&data));
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime_type,
            source: FileSource::Memory(data),
        }
    }

    /// Open a file on disk without reading it fully.
    pub async fn from_path(path: impl AsRef<Path>, mime_type: Option<&str>) -> UploadResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(UploadError::InvalidInput(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let mime_type = match mime_type {
            Some(m) => m.to_string(),
            None => {
                let mut head = Vec::with_capacity(SNIFF_LEN);
                let file = tokio::fs::File::open(path).await?;
                file.take(SNIFF_LEN as u64).read_to_end(&mut head).await?;
                sniff_mime(&head)
            }
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        Ok(Self {
            name,
            size: metadata.len(),
            mime_type,
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Read the bytes of one chunk.
    pub async fn read_range(&self, range: &ChunkRange) -> UploadResult<Bytes> {
        if range.end > self.size || range.start > range.end {
            return Err(UploadError::InvalidInput(format!(
                "Range {}..{} outside file of {} bytes",
                range.start, range.end, self.size
            )));
        }

        match &self.source {
            FileSource::Memory(data) => Ok(data.slice(range.start as usize..range.end as usize)),
            FileSource::Path(path) => {
                let mut file = tokio::fs::File::open(path).await?;
                file.seek(std::io::SeekFrom::Start(range.start)).await?;
                let mut buffer = vec![0u8; range.len() as usize];
                file.read_exact(&mut buffer).await?;
                Ok(Bytes::from(buffer))
            }
        }
    }
}

fn sniff_mime(head: &[u8]) -> String {
    infer::get(head)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}
