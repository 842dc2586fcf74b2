use std::path::{Path, PathBuf};

use scrape_logging::scrape_info;
use vacancy_core::ResultSink;

use crate::filename::export_filename;
use crate::persist::{write_atomically, PersistError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub record_count: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Writes the whole sink as `{output_dir}/{query}.json`. The sink is not
/// cleared, so exporting again without new records gives the same bytes.
pub fn export_results(
    sink: &ResultSink,
    output_dir: &Path,
    query: &str,
) -> Result<ExportSummary, ExportError> {
    let json = sink.export_json()?;
    let output_path = write_atomically(output_dir, &export_filename(query), json.as_bytes())?;
    scrape_info!(
        "Exported {} records to {}",
        sink.len(),
        output_path.display()
    );
    Ok(ExportSummary {
        record_count: sink.len(),
        output_path,
    })
}
