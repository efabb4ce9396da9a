use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::aggregate::ComparisonRow;

/// Write the rows as a tab-separated table with a header line.
/// Fields are never quoted.
pub fn write_rows<W: Write>(out: W, rows: &[ComparisonRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(true)
        .from_writer(out);

    if rows.is_empty() {
        // serde only emits the header together with the first record
        writer.write_record(HEADER)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_report(path: &Path, rows: &[ComparisonRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Could not create output file {}", path.display()))?;
    write_rows(std::io::BufWriter::new(file), rows)
        .with_context(|| format!("Failed writing report to {}", path.display()))
}

pub const HEADER: [&str; 14] = [
    "Subread ID",
    "Subread CIGAR",
    "Expected CIGAR",
    "Start",
    "Stop",
    "Long Read CIGAR",
    "Shared Matches",
    "Shared Insertions",
    "Shared Deletions",
    "Shared Splices",
    "Soft Clips",
    "Unmatched Subread",
    "Accuracy",
    "Precision",
];
