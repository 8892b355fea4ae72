//! Tabular report serialization.
//!
//! One CSV row per `ActionRecord`, stable column order, suitable for audit
//! or spreadsheet import.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::types::ActionRecord;

const HEADERS: [&str; 9] = [
    "kept_path",
    "duplicate_path",
    "hash_distance",
    "kept_resolution",
    "duplicate_resolution",
    "kept_size",
    "duplicate_size",
    "action",
    "error",
];

/// Write the full action sequence as CSV
pub fn write_report(path: &Path, records: &[ActionRecord]) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{}", HEADERS.join(","))?;
    for record in records {
        writeln!(out, "{}", format_row(record))?;
    }
    out.flush()?;

    info!(
        "Report with {} rows written to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

fn format_row(record: &ActionRecord) -> String {
    let fields = [
        record.kept_path.to_string_lossy().into_owned(),
        record.duplicate_path.to_string_lossy().into_owned(),
        record.hash_distance.to_string(),
        format_resolution(record.kept_resolution),
        format_resolution(record.duplicate_resolution),
        record.kept_size.to_string(),
        record.duplicate_size.to_string(),
        record.action.label().to_string(),
        record.error.clone().unwrap_or_default(),
    ];
    fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn format_resolution((width, height): (u32, u32)) -> String {
    format!("{}x{}", width, height)
}

/// Double-quote fields containing separators, per RFC 4180
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
