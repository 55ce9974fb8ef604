use crate::config::history::load_history_csv;
use crate::core::DrawSettings;
use crate::domain::model::{History, HistoryEntry};
use crate::utils::error::{DrawError, Result};
use crate::utils::validation::{self, Validate};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_PATH: &str = "./Results";
pub const SUPPORTED_FORMATS: [&str; 2] = ["txt", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub drawing: DrawingConfig,
    pub participants: Vec<ParticipantConfig>,
    pub history: Option<HistoryConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingConfig {
    pub name: String,
    pub year: Option<i32>,
    pub seed: Option<u64>,
    pub max_attempts: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantConfig {
    pub name: String,
    pub exclusions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub file: Option<String>,
    pub records: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub formats: Option<Vec<String>>,
    pub console: Option<bool>,
    pub write_full: Option<bool>,
    pub write_individual: Option<bool>,
    pub write_history: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DrawError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DrawError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GIFT_BUDGET})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| DrawError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("drawing.name", &self.drawing.name)?;

        if self.participants.len() < 2 {
            return Err(DrawError::ConfigValidationError {
                field: "participants".to_string(),
                message: format!(
                    "A drawing needs at least 2 participants, found {}",
                    self.participants.len()
                ),
            });
        }

        for participant in &self.participants {
            validation::validate_participant_name("participants.name", &participant.name)?;
        }
        validation::validate_unique_names(
            "participants.name",
            self.participants.iter().map(|p| p.name.as_str()),
        )?;

        if let Some(max_attempts) = self.drawing.max_attempts {
            validation::validate_positive_number("drawing.max_attempts", max_attempts, 1)?;
        }

        validation::validate_path("output.path", self.output_path())?;
        validation::validate_formats("output.formats", &self.formats(), &SUPPORTED_FORMATS)?;

        if let Some(file) = self.history.as_ref().and_then(|h| h.file.as_deref()) {
            validation::validate_path("history.file", file)?;
        }

        Ok(())
    }

    /// 參與者名單 (依設定檔順序)
    pub fn roster(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }

    /// Participants without an `exclusions` key are left out, which the
    /// registry reports as missing exclusion data.
    pub fn static_exclusions(&self) -> HashMap<String, Vec<String>> {
        self.participants
            .iter()
            .filter_map(|p| p.exclusions.clone().map(|excluded| (p.name.clone(), excluded)))
            .collect()
    }

    /// History file location, relative paths taken from `config_dir`.
    pub fn history_file(&self, config_dir: &Path) -> Option<PathBuf> {
        let file = self.history.as_ref()?.file.as_ref()?;
        let path = Path::new(file);
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            Some(config_dir.join(path))
        }
    }

    /// Inline records plus the history file, if any.
    pub fn load_history(&self, history_file: Option<&Path>) -> Result<History> {
        let mut history = History::new();

        if let Some(records) = self.history.as_ref().and_then(|h| h.records.clone()) {
            history.extend(records);
        }

        if let Some(path) = history_file {
            tracing::info!("📜 Loading history from: {}", path.display());
            history.extend(load_history_csv(path)?);
        }

        Ok(history)
    }

    fn output(&self) -> OutputConfig {
        self.output.clone().unwrap_or_default()
    }

    pub fn output_mut(&mut self) -> &mut OutputConfig {
        self.output.get_or_insert_with(OutputConfig::default)
    }

    /// 取得輸出路徑
    pub fn output_path(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.path.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn formats(&self) -> Vec<String> {
        self.output()
            .formats
            .unwrap_or_else(|| vec!["txt".to_string()])
    }

    pub fn console_enabled(&self) -> bool {
        self.output().console.unwrap_or(true)
    }

    pub fn write_full(&self) -> bool {
        self.output().write_full.unwrap_or(false)
    }

    pub fn write_individual(&self) -> bool {
        self.output().write_individual.unwrap_or(false)
    }

    pub fn write_history(&self) -> bool {
        self.output().write_history.unwrap_or(false)
    }

    /// 是否需要寫出任何檔案
    pub fn writes_files(&self) -> bool {
        self.write_full() || self.write_individual() || self.write_history()
    }
}

impl DrawSettings for TomlConfig {
    fn drawing_name(&self) -> &str {
        &self.drawing.name
    }

    fn year(&self) -> i32 {
        self.drawing
            .year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    fn seed(&self) -> Option<u64> {
        self.drawing.seed
    }

    fn max_attempts(&self) -> Option<u64> {
        self.drawing.max_attempts
    }

    fn output_path(&self) -> &str {
        self.output_path()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
