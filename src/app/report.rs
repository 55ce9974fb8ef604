use crate::config::history::encode_history_csv;
use crate::config::TomlConfig;
use crate::core::{Assignment, DrawOutcome, HistoryEntry, Storage};
use crate::utils::error::Result;
use serde::Serialize;

pub const FULL_RESULTS_TXT: &str = "full_results.txt";
pub const FULL_RESULTS_JSON: &str = "full_results.json";
pub const INDIVIDUAL_RESULTS_DIR: &str = "Individual_Results";

pub fn format_line(giver: &str, recipient: &str) -> String {
    format!("{} --> {}", giver, recipient)
}

/// One `giver --> recipient` line per participant, newline-terminated.
pub fn render_lines(assignment: &Assignment) -> String {
    assignment
        .pairs()
        .iter()
        .map(|(giver, recipient)| format_line(giver, recipient) + "\n")
        .collect()
}

/// Which result files a run writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPlan {
    pub full: bool,
    pub formats: Vec<String>,
    pub individual: bool,
    pub history: bool,
}

impl OutputPlan {
    pub fn is_empty(&self) -> bool {
        !(self.full || self.individual || self.history)
    }
}

impl From<&TomlConfig> for OutputPlan {
    fn from(config: &TomlConfig) -> Self {
        Self {
            full: config.write_full(),
            formats: config.formats(),
            individual: config.write_individual(),
            history: config.write_history(),
        }
    }
}

/// A result file rendered in memory, relative to the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: String,
    pub data: Vec<u8>,
}

impl RenderedFile {
    fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    drawing: &'a str,
    year: i32,
    attempts: u64,
    failures: u64,
    assignments: Vec<JsonPair<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonPair<'a> {
    giver: &'a str,
    recipient: &'a str,
}

/// 寫出抽籤結果
pub struct ResultReporter<S: Storage> {
    storage: S,
    drawing_name: String,
    year: i32,
}

impl<S: Storage> ResultReporter<S> {
    pub fn new(storage: S, drawing_name: impl Into<String>, year: i32) -> Self {
        Self {
            storage,
            drawing_name: drawing_name.into(),
            year,
        }
    }

    /// Renders every file in `plan`, then writes them. Nothing is written if
    /// rendering fails; if a write fails, every file written by this call is
    /// removed again.
    pub async fn write_outputs(&self, outcome: &DrawOutcome, plan: &OutputPlan) -> Result<Vec<String>> {
        let files = self.render(outcome, plan)?;
        self.write_all(files).await
    }

    pub fn render(&self, outcome: &DrawOutcome, plan: &OutputPlan) -> Result<Vec<RenderedFile>> {
        let mut files = Vec::new();
        if plan.full {
            files.extend(self.render_full_results(outcome, &plan.formats)?);
        }
        if plan.individual {
            files.extend(self.render_individual_results(&outcome.assignment));
        }
        if plan.history {
            files.push(self.render_history(&outcome.assignment)?);
        }
        Ok(files)
    }

    /// `full_results.txt`, plus `full_results.json` when `json` is among
    /// `formats`.
    pub fn render_full_results(&self, outcome: &DrawOutcome, formats: &[String]) -> Result<Vec<RenderedFile>> {
        let mut files = Vec::new();
        for format in formats {
            match format.as_str() {
                "txt" => files.push(RenderedFile::new(
                    FULL_RESULTS_TXT,
                    render_lines(&outcome.assignment),
                )),
                "json" => files.push(RenderedFile::new(FULL_RESULTS_JSON, self.render_json(outcome)?)),
                other => tracing::warn!("Skipping unsupported output format: {}", other),
            }
        }
        Ok(files)
    }

    /// One file per participant holding only their recipient's name.
    pub fn render_individual_results(&self, assignment: &Assignment) -> Vec<RenderedFile> {
        assignment
            .pairs()
            .iter()
            .map(|(giver, recipient)| {
                RenderedFile::new(
                    format!("{}/{}.txt", INDIVIDUAL_RESULTS_DIR, giver),
                    recipient.as_str(),
                )
            })
            .collect()
    }

    /// `history_<year>.csv` so the next drawing can exclude this one.
    pub fn render_history(&self, assignment: &Assignment) -> Result<RenderedFile> {
        let entries: Vec<HistoryEntry> = assignment
            .pairs()
            .iter()
            .map(|(giver, recipient)| HistoryEntry {
                year: self.year,
                giver: giver.clone(),
                recipient: recipient.clone(),
            })
            .collect();

        let data = encode_history_csv(&entries)?;
        Ok(RenderedFile::new(format!("history_{}.csv", self.year), data))
    }

    async fn write_all(&self, files: Vec<RenderedFile>) -> Result<Vec<String>> {
        let mut written: Vec<String> = Vec::with_capacity(files.len());
        for file in files {
            if let Err(e) = self.storage.write_file(&file.path, &file.data).await {
                tracing::error!("Failed to write {}: {}, removing partial results", file.path, e);
                for done in &written {
                    if let Err(cleanup) = self.storage.remove_file(done).await {
                        tracing::warn!("Could not remove {}: {}", done, cleanup);
                    }
                }
                return Err(e);
            }
            tracing::debug!("Wrote {}", file.path);
            written.push(file.path);
        }

        tracing::info!("📁 Wrote {} result files", written.len());
        Ok(written)
    }

    fn render_json(&self, outcome: &DrawOutcome) -> Result<Vec<u8>> {
        let report = JsonReport {
            drawing: &self.drawing_name,
            year: self.year,
            attempts: outcome.attempts,
            failures: outcome.failures,
            assignments: outcome
                .assignment
                .pairs()
                .iter()
                .map(|(giver, recipient)| JsonPair { giver, recipient })
                .collect(),
        };
        let mut json = serde_json::to_vec_pretty(&report)?;
        json.push(b'\n');
        Ok(json)
    }
}
