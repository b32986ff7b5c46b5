//! Import orchestration and batch commit
//!
//! This module provides the asynchronous half of an import:
//! - Emission of conditional PUT entries ([`emit`])
//! - Chunking and per-chunk reports ([`batch`])
//! - Concurrent commit and end-to-end coordination ([`coordinator`])
//! - Summary and reporting ([`summary`])

pub mod batch;
pub mod coordinator;
pub mod emit;
pub mod summary;

pub use batch::{partition, ChunkReport, ChunkStatus, DEFAULT_CHUNK_SIZE};
pub use coordinator::{BatchCommitCoordinator, ImportCoordinator};
pub use emit::{BundleEntryEmitter, TransformedImport};
pub use summary::ImportSummary;
