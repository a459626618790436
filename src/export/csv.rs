use std::fs;
use std::path::Path;

use tracing::info;

use crate::app::Result;
use crate::domain::{Field, ReviewRecord};
use crate::scraper::collapse_newlines;

/// Quote a cell, doubling embedded quotes. Empty values stay unquoted.
pub fn escape_cell(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(record: &ReviewRecord) -> String {
    Field::ALL
        .iter()
        .map(|field| match field {
            Field::Body => escape_cell(&collapse_newlines(record.body.as_str())),
            _ => escape_cell(record.get(*field)),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the header and one row per record, joined by `\n`
pub fn to_csv(records: &[ReviewRecord]) -> String {
    let header = Field::ALL
        .iter()
        .map(|f| f.header())
        .collect::<Vec<_>>()
        .join(",");

    std::iter::once(header)
        .chain(records.iter().map(row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write records to `path` as UTF-8 CSV
pub fn write_csv(path: &Path, records: &[ReviewRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_csv(records))?;
    info!("Wrote {} reviews to {}", records.len(), path.display());
    Ok(())
}
