//! CSV export for analysis component losses.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::api::types::AnalysisResult;

/// Column header for component loss export.
const HEADER: &str = "id,type,loss_mwh,loss_percent,method";

/// Exports the per-component losses of `result` to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_component_losses(result: &AnalysisResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_component_losses_csv(result, buf)
}

/// Writes the per-component losses of `result` as CSV to any writer.
///
/// One header row, then one row per component in the order the backend
/// reported them.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_component_losses_csv(result: &AnalysisResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for loss in result.component_losses() {
        wtr.write_record(&[
            loss.id.clone(),
            loss.component_type.clone(),
            format!("{:.3}", loss.loss_mwh),
            format!("{:.2}", loss.loss_percent),
            loss.method.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
