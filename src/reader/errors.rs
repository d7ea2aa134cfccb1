use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Error opening batch file at path: {} | {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("Batch tokenizing error: {0}")]
    Csv(#[from] csv::Error)
}
