//! Chunking of emitted entries
//!
//! Emitted upserts are split into contiguous chunks; each chunk becomes one
//! transaction bundle and is committed independently of its siblings.

use crate::domain::{ImportError, Result};
use std::time::Duration;

/// Default number of entries per transaction bundle
pub const DEFAULT_CHUNK_SIZE: usize = 74;

/// Splits `items` into contiguous chunks of at most `chunk_size`
///
/// Yields `ceil(N / chunk_size)` chunks whose concatenation is the input.
///
/// # Errors
///
/// Returns [`ImportError::Validation`] when `chunk_size` is zero.
///
/// # Examples
///
/// ```
/// use ersd_import::core::import::partition;
///
/// let chunks = partition((0..10).collect(), 4).unwrap();
/// assert_eq!(chunks, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9]]);
/// ```
pub fn partition<T>(items: Vec<T>, chunk_size: usize) -> Result<Vec<Vec<T>>> {
    if chunk_size == 0 {
        return Err(ImportError::Validation(
            "chunk size must be at least 1".to_string(),
        ));
    }

    let mut chunks = Vec::with_capacity(items.len().div_ceil(chunk_size));
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        chunks.push(items.by_ref().take(chunk_size).collect());
    }
    Ok(chunks)
}

/// Outcome of committing one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkStatus {
    Succeeded,
    /// The repository rejected the chunk or the commit task died
    Failed(String),
    /// Still running when the commit deadline passed; aborted
    TimedOut,
}

/// Per-chunk commit report
#[derive(Debug, Clone)]
pub struct ChunkReport {
    /// Position of the chunk in emission order
    pub index: usize,

    /// Number of entries in the chunk
    pub size: usize,

    pub duration: Duration,

    pub status: ChunkStatus,
}

impl ChunkReport {
    pub fn is_success(&self) -> bool {
        self.status == ChunkStatus::Succeeded
    }

    /// Error text for failed or timed out chunks
    pub fn error(&self) -> Option<String> {
        match &self.status {
            ChunkStatus::Succeeded => None,
            ChunkStatus::Failed(message) => Some(message.clone()),
            ChunkStatus::TimedOut => Some("commit deadline exceeded".to_string()),
        }
    }
}
