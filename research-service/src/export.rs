//! CSV export of collected insight records.

use research_core::{CoreError, InsightRecord};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_HEADER: [&str; 6] = ["source", "community", "text", "score", "url", "sentiment"];

/// Writes a header row followed by one row per record. The header is written
/// even when there are no records.
pub fn write_csv<W: Write>(records: &[InsightRecord], writer: W) -> Result<(), CoreError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_bytes(records: &[InsightRecord]) -> Result<Vec<u8>, CoreError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(buffer)
}

pub fn save_csv(records: &[InsightRecord], path: &Path) -> Result<PathBuf, CoreError> {
    let file = File::create(path)?;
    write_csv(records, file)?;
    info!("Exported {} records to {}", records.len(), path.display());
    Ok(path.to_path_buf())
}

/// Async variant of [`save_csv`] for the GUI executor.
pub async fn export_csv(records: Vec<InsightRecord>, path: PathBuf) -> Result<PathBuf, CoreError> {
    let bytes = to_csv_bytes(&records)?;
    tokio::fs::write(&path, bytes).await?;
    info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}
