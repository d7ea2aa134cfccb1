mod artifact;
mod config;
mod engine;
mod models;
mod reader;
mod report;
mod rules;
mod types;
mod upstream;

use std::fs::File;
use std::io::{stderr, stdout, BufWriter};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::artifact::QrRenderer;
use crate::config::Cli;
use crate::engine::BatchPipeline;
use crate::models::UuidRequestIds;
use crate::upstream::HttpGateway;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    setup_logging(cli.level_filter());

    let gateway = HttpGateway::new(cli.gateway_config())?;
    let renderer = QrRenderer::new(cli.artifacts_dir.clone());

    let pipeline = BatchPipeline::new(Arc::new(gateway), Arc::new(UuidRequestIds))
        .with_concurrency(cli.concurrency)
        .with_renderer(Arc::new(renderer), cli.artifact_sizes());

    let timer = Instant::now();
    let report = pipeline.run(&cli.input).await?;
    let duration = timer.elapsed();

    info!("Processed {} row(s) in: {duration:?}", report.len());

    report::write_csv(&report, BufWriter::new(stdout().lock()))?;

    if let Some(path) = &cli.html {
        let file = File::create(path).with_context(|| format!("Error creating HTML report at path: {}", path.display()))?;
        report::write_html(&report, BufWriter::new(file))?;
    }

    eprintln!("{}", report.status_line());

    Ok(())
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Results go to stdout, so logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
