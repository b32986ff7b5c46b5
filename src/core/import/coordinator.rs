//! Import coordinator - main orchestrator for the import process
//!
//! This module drives an import end to end: request validation, the
//! synchronous transform, emission against the repository and the concurrent
//! chunked commit.

use crate::adapters::repository::FhirRepository;
use crate::config::ImportConfig;
use crate::core::import::batch::{partition, ChunkReport, ChunkStatus};
use crate::core::import::emit::{BundleEntryEmitter, TransformedImport};
use crate::core::import::summary::ImportSummary;
use crate::core::transform::transform_bundle;
use crate::domain::{ImportRequest, Result, TransactionBundle, UpsertEntry};
use crate::log_chunk_committed;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinHandle, JoinSet};

/// Aborts the wrapped task when dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Commits upsert entries as concurrent transaction chunks
///
/// A failed chunk never aborts its siblings; every chunk ends up in the
/// summary with its own status.
pub struct BatchCommitCoordinator {
    repository: Arc<dyn FhirRepository + Send + Sync>,
    chunk_size: usize,
    commit_timeout: Duration,
}

impl BatchCommitCoordinator {
    pub fn new(
        repository: Arc<dyn FhirRepository + Send + Sync>,
        chunk_size: usize,
        commit_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            chunk_size,
            commit_timeout,
        }
    }

    pub fn from_config(
        repository: Arc<dyn FhirRepository + Send + Sync>,
        config: &ImportConfig,
    ) -> Self {
        Self::new(
            repository,
            config.chunk_size,
            Duration::from_secs(config.commit_timeout_secs),
        )
    }

    /// Commit all entries
    ///
    /// # Errors
    ///
    /// Only fails when the chunk size is zero. Chunk failures are reported
    /// in the returned summary.
    pub async fn commit(&self, entries: Vec<UpsertEntry>) -> Result<ImportSummary> {
        let started_at = Utc::now();
        let start_time = Instant::now();
        let entries_total = entries.len();

        let chunks = partition(entries, self.chunk_size)?;
        let chunk_count = chunks.len();
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();

        tracing::info!(
            entries = entries_total,
            chunks = chunk_count,
            chunk_size = self.chunk_size,
            backend = self.repository.backend_name(),
            "Committing import"
        );

        let mut tasks = JoinSet::new();
        for (index, chunk) in chunks.into_iter().enumerate() {
            let repository = Arc::clone(&self.repository);
            tasks.spawn(commit_chunk(repository, index, chunk));
        }

        // Timeouts too large to represent as an instant mean no deadline
        let deadline = tokio::time::Instant::now().checked_add(self.commit_timeout);
        let mut reports: Vec<Option<ChunkReport>> = vec![None; chunk_count];
        let mut timed_out = false;

        loop {
            let joined = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, tasks.join_next()).await,
                None => Ok(tasks.join_next().await),
            };
            match joined {
                Ok(Some(Ok(report))) => {
                    match &report.status {
                        ChunkStatus::Succeeded => {
                            log_chunk_committed!(report.index, report.size, report.duration);
                        }
                        ChunkStatus::Failed(error) => tracing::error!(
                            chunk = report.index,
                            entries = report.size,
                            error = %error,
                            "Chunk commit failed"
                        ),
                        ChunkStatus::TimedOut => {}
                    }
                    let index = report.index;
                    reports[index] = Some(report);
                }
                Ok(Some(Err(e))) => {
                    tracing::error!(error = %e, "Commit task ended unexpectedly");
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = self.commit_timeout.as_secs(),
                        pending = tasks.len(),
                        "Commit deadline exceeded, aborting pending chunks"
                    );
                    tasks.abort_all();
                    timed_out = true;
                    break;
                }
            }
        }

        let elapsed = start_time.elapsed();
        let chunks = reports
            .into_iter()
            .enumerate()
            .map(|(index, report)| {
                report.unwrap_or_else(|| ChunkReport {
                    index,
                    size: sizes[index],
                    duration: elapsed,
                    status: if timed_out {
                        ChunkStatus::TimedOut
                    } else {
                        ChunkStatus::Failed("commit task ended unexpectedly".to_string())
                    },
                })
            })
            .collect();

        let mut summary = ImportSummary::new(started_at).with_duration(elapsed);
        summary.chunks = chunks;
        summary.entries_total = entries_total;
        Ok(summary)
    }
}

/// Commits one chunk on its own task so that a panic is reported per chunk
async fn commit_chunk(
    repository: Arc<dyn FhirRepository + Send + Sync>,
    index: usize,
    chunk: Vec<UpsertEntry>,
) -> ChunkReport {
    let started = Instant::now();
    let bundle = TransactionBundle::new(chunk);
    let size = bundle.len();

    tracing::debug!(chunk = index, bundle_id = %bundle.id, entries = size, "Submitting chunk");

    let mut task = AbortOnDrop(tokio::spawn(
        async move { repository.transaction(bundle).await },
    ));

    let status = match (&mut task.0).await {
        Ok(Ok(_)) => ChunkStatus::Succeeded,
        Ok(Err(e)) => ChunkStatus::Failed(e.to_string()),
        Err(e) if e.is_panic() => ChunkStatus::Failed(format!("commit task panicked: {e}")),
        Err(e) => ChunkStatus::Failed(e.to_string()),
    };

    ChunkReport {
        index,
        size,
        duration: started.elapsed(),
        status,
    }
}

/// Runs imports against one repository
///
/// # Example
///
/// ```rust,no_run
/// use ersd_import::adapters::memory::InMemoryRepository;
/// use ersd_import::config::ImportConfig;
/// use ersd_import::core::import::ImportCoordinator;
/// use ersd_import::domain::ImportRequest;
/// use std::sync::Arc;
///
/// # async fn example(bundle: serde_json::Value) -> ersd_import::domain::Result<()> {
/// let coordinator = ImportCoordinator::new(
///     Arc::new(InMemoryRepository::new()),
///     ImportConfig::default(),
/// );
///
/// let request = ImportRequest::new("https://vsm.example.org/fhir", bundle);
/// let summary = coordinator.execute(request).await?;
/// println!("{}", summary.message());
/// # Ok(())
/// # }
/// ```
pub struct ImportCoordinator {
    repository: Arc<dyn FhirRepository + Send + Sync>,
    config: ImportConfig,
    dry_run: bool,
}

impl ImportCoordinator {
    pub fn new(repository: Arc<dyn FhirRepository + Send + Sync>, config: ImportConfig) -> Self {
        Self {
            repository,
            config,
            dry_run: false,
        }
    }

    /// Mark summaries produced by this coordinator as dry runs
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate, transform and emit without committing
    ///
    /// # Errors
    ///
    /// Returns validation, conflict and exists errors. Nothing has been
    /// written when this fails.
    pub async fn prepare(&self, request: ImportRequest) -> Result<TransformedImport> {
        let validated = request.validate()?;

        tracing::info!(
            app_authoritative_url = %validated.app_authoritative_url,
            entries = validated.bundle.entry.len(),
            "Transforming bundle"
        );

        let transformed = transform_bundle(validated.bundle, &validated.app_authoritative_url)?;

        BundleEntryEmitter::new(Arc::clone(&self.repository))
            .emit(transformed)
            .await
    }

    /// Commit previously prepared entries
    pub async fn commit(&self, prepared: TransformedImport) -> Result<ImportSummary> {
        let skipped = prepared.skipped_value_sets.len();
        let coordinator =
            BatchCommitCoordinator::from_config(Arc::clone(&self.repository), &self.config);

        let mut summary = coordinator.commit(prepared.entries).await?;
        summary.skipped_value_sets = skipped;
        summary.dry_run = self.dry_run;
        Ok(summary)
    }

    /// Run a full import
    pub async fn execute(&self, request: ImportRequest) -> Result<ImportSummary> {
        let prepared = self.prepare(request).await?;
        self.commit(prepared).await
    }
}
