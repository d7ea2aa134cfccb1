use crate::artifact::{artifact_file_name, ArtifactRenderer, RenderedArtifact};
use crate::engine::{aggregator, BatchReport, ProcessedRow, RowOutcome};
use crate::models::{InstructionKind, RequestIdGenerator, Row};
use crate::reader::spawn_batch_reader;
use crate::rules::{classify, validate};
use crate::upstream::{dispatch, PaymentGateway};
use futures::stream::{self, Stream, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Pixel sizes for the inline preview and the downloadable image.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ArtifactSizes {
    pub preview: u32,
    pub download: u32
}

impl Default for ArtifactSizes {
    fn default() -> Self {
        Self { preview: 90, download: 300 }
    }
}

/// Classifies, validates, dispatches and records every row of a batch.
///
/// Rows are independent: a rejected or failed row never affects another, and the report
/// always lists outcomes in input order, whatever the dispatch concurrency.
pub struct BatchPipeline {
    gateway: Arc<dyn PaymentGateway>,
    request_ids: Arc<dyn RequestIdGenerator>,
    renderer: Option<Arc<dyn ArtifactRenderer>>,
    artifact_sizes: ArtifactSizes,
    concurrency: usize,
    backpressure: usize
}

impl BatchPipeline {
    pub fn new(gateway: Arc<dyn PaymentGateway>, request_ids: Arc<dyn RequestIdGenerator>) -> Self {
        Self {
            gateway,
            request_ids,
            renderer: None,
            artifact_sizes: ArtifactSizes::default(),
            concurrency: 1,
            backpressure: 256
        }
    }

    /// Maximum number of upstream calls in flight. Values below one are treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ArtifactRenderer>, sizes: ArtifactSizes) -> Self {
        self.renderer = Some(renderer);
        self.artifact_sizes = sizes;
        self
    }

    /// Processes the batch file at `path` end to end.
    pub async fn run(&self, path: &Path) -> anyhow::Result<BatchReport> {
        let (sender, mut receiver) = mpsc::channel::<Row>(self.backpressure);
        let reader_handle = spawn_batch_reader(path.to_path_buf(), sender);

        let report = self.process_rows(stream::poll_fn(move |context| receiver.poll_recv(context))).await;

        let fed = reader_handle.await??;
        debug!("Batch reader fed {fed} row(s) from {}", path.display());

        Ok(report)
    }

    /// Processes already tokenized rows.
    pub async fn run_rows(&self, rows: Vec<Row>) -> BatchReport {
        self.process_rows(stream::iter(rows)).await
    }

    async fn process_rows(&self, rows: impl Stream<Item = Row>) -> BatchReport {
        let processed: Vec<ProcessedRow> = rows
            .map(|row| self.process_row(row))
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = BatchReport { rows: processed };
        info!("{}", report.status_line());

        report
    }

    async fn process_row(&self, row: Row) -> ProcessedRow {
        let kind = classify(&row);

        let outcome = match validate(&kind, &row, self.request_ids.as_ref()) {
            Err(reason) => {
                warn!("Row [{}]:[{}] rejected: {reason}", row.number, kind.label());
                aggregator::rejected(&row, kind, &reason)
            }
            Ok(instruction) => {
                let call = dispatch(&instruction);
                let call_outcome = self.gateway.execute(&call).await;

                if let Err(error) = &call_outcome {
                    error!("Row [{}] {} call for request [{}] failed: {error}", row.number, call.operation(), call.request_id());
                }

                aggregator::record(&row, &instruction, call_outcome)
            }
        };

        debug!(
            "Row [{}]:[{}] finished dispatched [{}] status [{:?}] success [{}]",
            outcome.row_number, outcome.kind_label(), outcome.was_dispatched(), outcome.http_status, outcome.success
        );

        let artifact = self.render_artifact(&outcome);

        ProcessedRow { outcome, artifact }
    }

    //NOTE: Rendering runs after the outcome is fixed, it can degrade the artifact but never the row status
    fn render_artifact(&self, outcome: &RowOutcome) -> Option<RenderedArtifact> {
        let renderer = self.renderer.as_ref()?;

        let InstructionKind::Qr(qr_type) = outcome.kind else {
            return None;
        };

        let request_id = outcome.request_id.as_deref()?;
        let text = outcome.artifact_text.as_deref().unwrap_or_default();
        let filename = artifact_file_name(qr_type, outcome.row_number, request_id);

        Some(renderer.render_downloadable(text, self.artifact_sizes.preview, self.artifact_sizes.download, &filename))
    }
}
