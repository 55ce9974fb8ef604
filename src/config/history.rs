use crate::domain::model::HistoryEntry;
use crate::utils::error::{DrawError, Result};
use std::io::Read;
use std::path::Path;

/// 讀取歷年抽籤紀錄 (CSV: year,giver,recipient)
pub fn load_history_csv<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryEntry>> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| {
        DrawError::config(format!(
            "cannot open history file '{}': {}",
            path.as_ref().display(),
            e
        ))
    })?;
    read_history_csv(file)
}

pub fn read_history_csv<R: Read>(reader: R) -> Result<Vec<HistoryEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut entries = Vec::new();
    for row in reader.deserialize() {
        let entry: HistoryEntry = row?;
        if entry.giver.is_empty() || entry.recipient.is_empty() {
            return Err(DrawError::ConfigValidationError {
                field: "history".to_string(),
                message: format!("history row for year {} has an empty name", entry.year),
            });
        }
        entries.push(entry);
    }

    tracing::debug!("Read {} history rows", entries.len());
    Ok(entries)
}

/// Encodes entries in the same format `read_history_csv` accepts.
pub fn encode_history_csv(entries: &[HistoryEntry]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer
        .into_inner()
        .map_err(|e| DrawError::IoError(e.into_error()))
}
