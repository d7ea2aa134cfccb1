mod aggregator;
mod outcome;
mod pipeline;
#[cfg(test)]
mod tests;

pub use outcome::{BatchReport, ProcessedRow, RowOutcome, RowSummary};
pub use pipeline::{ArtifactSizes, BatchPipeline};
