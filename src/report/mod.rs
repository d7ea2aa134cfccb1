
use crate::artifact::{Download, RenderedArtifact};
use crate::engine::{BatchReport, ProcessedRow};
use crate::models::EMPTY_FIELD;
use std::io;
use std::io::Write;

const HEADER: [&str; 8] = ["row", "kind", "merchant", "amount", "party", "status", "result", "artifact"];

/// Writes one CSV line per row, in input order.
pub fn write_csv<W: Write>(report: &BatchReport, writer: W) -> Result<(), csv::Error> {
    let mut output = csv::Writer::from_writer(writer);

    output.write_record(HEADER)?;

    for row in &report.rows {
        output.write_record(columns(row))?;
    }

    output.flush()?;

    Ok(())
}

/// Writes a standalone HTML page with the same columns plus inline QR previews.
pub fn write_html<W: Write>(report: &BatchReport, mut writer: W) -> io::Result<()> {
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html><head><meta charset=\"utf-8\"><title>Batch results</title></head><body>")?;
    writeln!(writer, "<p>{}</p>", escape(&report.status_line()))?;
    writeln!(writer, "<table>")?;
    writeln!(writer, "<tr>{}</tr>", HEADER.iter().map(|name| format!("<th>{name}</th>")).collect::<String>())?;

    for row in &report.rows {
        let mut cells: Vec<String> = columns(row)[..7].iter().map(|value| format!("<td>{}</td>", escape(value))).collect();
        cells.push(format!("<td>{}</td>", artifact_cell(row.artifact.as_ref())));

        writeln!(writer, "<tr>{}</tr>", cells.concat())?;
    }

    writeln!(writer, "</table>")?;
    writeln!(writer, "</body></html>")?;
    writer.flush()
}

fn columns(row: &ProcessedRow) -> [String; 8] {
    let outcome = &row.outcome;
    let verdict = if outcome.success { "OK" } else { "FAILED" };

    [
        outcome.row_number.to_string(),
        outcome.kind_label(),
        outcome.summary.merchant.clone(),
        outcome.summary.amount.clone(),
        outcome.summary.party.clone(),
        outcome.http_status.map(|status| status.to_string()).unwrap_or_else(|| EMPTY_FIELD.to_string()),
        format!("{verdict} {}", outcome.message),
        artifact_label(row.artifact.as_ref())
    ]
}

fn artifact_label(artifact: Option<&RenderedArtifact>) -> String {
    match artifact.map(|artifact| &artifact.download) {
        Some(Download::Saved(path)) => path.display().to_string(),
        Some(Download::Unavailable(_)) => "download unavailable".to_string(),
        Some(Download::Skipped) | None => EMPTY_FIELD.to_string()
    }
}

fn artifact_cell(artifact: Option<&RenderedArtifact>) -> String {
    let Some(artifact) = artifact else {
        return EMPTY_FIELD.to_string();
    };

    let link = match &artifact.download {
        Download::Saved(path) => format!("<br><a href=\"{0}\" download>{0}</a>", escape(&path.display().to_string())),
        Download::Unavailable(_) => "<br>download unavailable".to_string(),
        Download::Skipped => String::new()
    };

    format!("{}{link}", artifact.preview.as_markup())
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
