//! Partition sources
//!
//! A partition is one independently processed input stream. Sources hand the
//! pipeline a buffered line reader with decompression already applied; gzip
//! input is recognized by its magic bytes rather than by file extension.

use crate::types::SummaryError;
use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Leading bytes of every gzip member
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A readable input partition
///
/// Implementations must be `Send` so a partition can be handed to a worker.
pub trait PartitionSource: Send {
    /// Identifier used when reporting results and failures
    fn id(&self) -> &str;

    /// Open the partition as a decoded line stream
    fn open(&self) -> Result<Box<dyn BufRead + Send>, SummaryError>;
}

/// Wrap `reader` in a gzip decoder if the stream starts with the gzip magic
pub fn decode<R>(mut reader: R) -> Result<Box<dyn BufRead + Send>, SummaryError>
where
    R: BufRead + Send + 'static,
{
    let compressed = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if compressed {
        // The decoder pulls from `reader`'s buffer; the outer buffer serves decoded lines
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Partition backed by a file on disk, plain or gzip-compressed
#[derive(Debug, Clone)]
pub struct FilePartition {
    path: PathBuf,
    id: String,
}

impl FilePartition {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let id = path.display().to_string();
        Self { path, id }
    }
}

impl PartitionSource for FilePartition {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> Result<Box<dyn BufRead + Send>, SummaryError> {
        let file = File::open(&self.path).map_err(|e| SummaryError::Stream {
            line: None,
            message: format!("Failed to open file '{}': {}", self.path.display(), e),
        })?;
        decode(BufReader::with_capacity(64 * 1024, file))
    }
}

/// Partition served from memory
///
/// Useful for tests and benchmarks; the bytes may be gzip-compressed.
#[derive(Debug, Clone)]
pub struct MemoryPartition {
    id: String,
    data: Arc<[u8]>,
}

impl MemoryPartition {
    pub fn new(id: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data: Vec<u8> = data.into();
        Self {
            id: id.into(),
            data: Arc::from(data),
        }
    }
}

impl PartitionSource for MemoryPartition {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> Result<Box<dyn BufRead + Send>, SummaryError> {
        decode(Cursor::new(Arc::clone(&self.data)))
    }
}
