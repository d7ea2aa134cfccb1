mod errors;

use crate::models::Row;
use csv::{ReaderBuilder, Trim};
use std::fs;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, error};

pub use errors::ReaderError;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Splits batch text into data rows.
///
/// The delimiter is a tab when the text contains one anywhere, otherwise a comma. The first
/// record is always a header and is discarded. Empty lines are skipped and every field is trimmed.
/// A line made only of delimiters or spaces is still a row and keeps its number.
pub fn read_rows(text: &str) -> Result<Vec<Row>, ReaderError> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let delimiter = if text.contains('\t') { b'\t' } else { b',' };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let fields = record.iter().map(str::to_string).collect();
        rows.push(Row::new(rows.len() + 1, fields));
    }

    debug!("Tokenized {} row(s) using {:?} as delimiter", rows.len(), delimiter as char);

    Ok(rows)
}

/// Reads the batch file on a blocking task and feeds its rows into the pipeline.
///
/// Returns the number of rows sent. Stops early when the receiving side has gone away.
pub fn spawn_batch_reader(path: PathBuf, sender: mpsc::Sender<Row>) -> JoinHandle<Result<usize, ReaderError>> {
    spawn_blocking(move || {
        let bytes = fs::read(&path).map_err(|source| ReaderError::Open { path: path.clone(), source })?;
        let rows = read_rows(&String::from_utf8_lossy(&bytes))?;
        let mut sent = 0;

        for row in rows {
            if sender.blocking_send(row).is_err() {
                error!("Row receiver dropped before the batch was fully fed");
                break;
            }

            sent += 1;
        }

        Ok(sent)
    })
}
