//! Import summary and reporting
//!
//! This module defines the structure returned by a completed commit phase.

use crate::core::import::batch::{ChunkReport, ChunkStatus};
use crate::domain::OperationOutcome;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Summary of an import operation
#[derive(Debug, Clone)]
pub struct ImportSummary {
    /// When the commit phase started
    pub started_at: DateTime<Utc>,

    /// Duration of the commit phase
    pub duration: Duration,

    /// One report per chunk, ordered by chunk index
    pub chunks: Vec<ChunkReport>,

    /// Number of entries submitted across all chunks
    pub entries_total: usize,

    /// Value sets left out because the repository already held them
    pub skipped_value_sets: usize,

    /// Whether the import ran against the in-memory repository
    pub dry_run: bool,
}

impl ImportSummary {
    /// Create a new empty import summary
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            duration: Duration::from_secs(0),
            chunks: Vec::new(),
            entries_total: 0,
            skipped_value_sets: 0,
            dry_run: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Chunks that failed or timed out
    pub fn failed_chunks(&self) -> Vec<&ChunkReport> {
        self.chunks.iter().filter(|c| !c.is_success()).collect()
    }

    /// True when every chunk committed
    pub fn is_fully_committed(&self) -> bool {
        self.chunks.iter().all(ChunkReport::is_success)
    }

    /// Number of entries in successfully committed chunks
    pub fn entries_committed(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.is_success())
            .map(|c| c.size)
            .sum()
    }

    pub fn message(&self) -> String {
        format!("Import completed in {} ms", self.duration.as_millis())
    }

    /// The operation outcome returned to callers
    pub fn outcome(&self) -> OperationOutcome {
        OperationOutcome::information(self.message())
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            chunks = self.chunks.len(),
            entries_total = self.entries_total,
            entries_committed = self.entries_committed(),
            skipped_value_sets = self.skipped_value_sets,
            duration_ms = self.duration.as_millis() as u64,
            dry_run = self.dry_run,
            "{}",
            self.message()
        );

        let failed = self.failed_chunks();
        if !failed.is_empty() {
            tracing::warn!(
                failed_chunks = failed.len(),
                "Import completed with failed chunks"
            );
            for chunk in failed {
                let timed_out = chunk.status == ChunkStatus::TimedOut;
                tracing::warn!(
                    chunk = chunk.index,
                    entries = chunk.size,
                    timed_out,
                    error = chunk.error().unwrap_or_default(),
                    "Chunk not committed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(index: usize, size: usize, status: ChunkStatus) -> ChunkReport {
        ChunkReport {
            index,
            size,
            duration: Duration::from_millis(10),
            status,
        }
    }

    #[test]
    fn test_outcome_message() {
        let summary = ImportSummary::new(Utc::now()).with_duration(Duration::from_millis(1234));
        let outcome = summary.outcome();

        assert_eq!(outcome.resource_type, "OperationOutcome");
        assert_eq!(outcome.issue[0].severity, "information");
        assert_eq!(
            outcome.issue[0].diagnostics.as_deref(),
            Some("Import completed in 1234 ms")
        );
    }

    #[test]
    fn test_failed_chunks() {
        let mut summary = ImportSummary::new(Utc::now());
        summary.chunks = vec![
            report(0, 74, ChunkStatus::Succeeded),
            report(1, 74, ChunkStatus::Failed("rejected".to_string())),
            report(2, 3, ChunkStatus::TimedOut),
        ];
        summary.entries_total = 151;

        assert!(!summary.is_fully_committed());
        assert_eq!(summary.failed_chunks().len(), 2);
        assert_eq!(summary.entries_committed(), 74);
    }

    #[test]
    fn test_empty_summary_is_committed() {
        let summary = ImportSummary::new(Utc::now());
        assert!(summary.is_fully_committed());
        assert!(summary.failed_chunks().is_empty());
    }
}
