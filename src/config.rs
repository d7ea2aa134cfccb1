use crate::engine::ArtifactSizes;
use crate::upstream::GatewayConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Submit a batch of payouts, QR codes and real-time transfers to the aggregator API.
///
/// Writes one CSV result line per batch row to stdout. Logs go to stderr.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Batch file, comma or tab delimited, first line is a header
    pub input: PathBuf,

    /// Aggregator API base URL
    #[arg(long, env = "RAAST_BASE_URL", default_value = "https://api.getsafepay.com")]
    pub base_url: String,

    #[arg(long, env = "RAAST_AGGREGATOR_ID")]
    pub aggregator_id: String,

    #[arg(long, env = "RAAST_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Per-call upstream timeout
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Upstream calls allowed in flight at once (results stay in row order)
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Directory receiving downloadable QR images
    #[arg(long, default_value = "qr-artifacts")]
    pub artifacts_dir: PathBuf,

    #[arg(long, default_value_t = 90)]
    pub preview_size: u32,

    #[arg(long, default_value_t = 300)]
    pub download_size: u32,

    /// Also write an HTML report with inline QR previews
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// error, warn, info, debug or trace
    #[arg(long, env = "RAAST_LOG_LEVEL", default_value = "error")]
    pub log_level: String
}

impl Cli {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
            aggregator_id: self.aggregator_id.clone(),
            secret_key: self.secret_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs)
        }
    }

    pub fn artifact_sizes(&self) -> ArtifactSizes {
        ArtifactSizes {
            preview: self.preview_size,
            download: self.download_size
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        parse_log_level(&self.log_level)
    }
}

pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}
