pub mod history;
pub mod toml_config;

pub use toml_config::TomlConfig;

/// Attempt cap the command line applies unless `--unbounded` is given.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "polyanna")]
#[command(about = "Gift exchange drawing with exclusions and yearly history")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "polyanna.toml")]
    pub config: String,

    /// History CSV to use instead of the one named in the config
    #[arg(long)]
    pub history: Option<String>,

    /// Seed for a reproducible drawing
    #[arg(long)]
    pub seed: Option<u64>,

    /// Give up after this many attempts
    #[arg(long, conflicts_with = "unbounded")]
    pub max_attempts: Option<u64>,

    /// Retry until a drawing completes, however long it takes
    #[arg(long)]
    pub unbounded: bool,

    /// Override output directory from config
    #[arg(long)]
    pub output_path: Option<String>,

    /// Override the drawing year from config
    #[arg(long)]
    pub year: Option<i32>,

    /// Write full_results to the output directory
    #[arg(long)]
    pub write_full: Option<bool>,

    /// Write one confidential file per participant
    #[arg(long)]
    pub write_individual: Option<bool>,

    /// Write this drawing as a history CSV for next year
    #[arg(long)]
    pub write_history: Option<bool>,

    /// Do not print who gives to whom
    #[arg(long)]
    pub hide_results: bool,

    /// Dry run - check config and history without drawing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 套用命令列覆蓋設定
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(seed) = self.seed {
            config.drawing.seed = Some(seed);
            tracing::info!("🔧 Seed overridden to: {}", seed);
        }

        if let Some(year) = self.year {
            config.drawing.year = Some(year);
        }

        config.drawing.max_attempts = if self.unbounded {
            None
        } else {
            self.max_attempts
                .or(config.drawing.max_attempts)
                .or(Some(DEFAULT_MAX_ATTEMPTS))
        };

        let output = config.output_mut();
        if let Some(path) = &self.output_path {
            output.path = Some(path.clone());
        }
        if let Some(write_full) = self.write_full {
            output.write_full = Some(write_full);
        }
        if let Some(write_individual) = self.write_individual {
            output.write_individual = Some(write_individual);
        }
        if let Some(write_history) = self.write_history {
            output.write_history = Some(write_history);
        }
        if self.hide_results {
            output.console = Some(false);
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::DrawSettings;

    fn config() -> TomlConfig {
        TomlConfig::from_toml_str(
            r#"
[drawing]
name = "cli"
max_attempts = 50

[[participants]]
name = "Ann"
exclusions = []

[[participants]]
name = "Bob"
exclusions = []
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_config_attempt_cap_kept_without_flag() {
        let cli = CliConfig::parse_from(["polyanna"]);
        let mut config = config();
        cli.apply_to(&mut config);
        assert_eq!(config.max_attempts(), Some(50));
    }

    #[test]
    fn test_default_attempt_cap_applied() {
        let cli = CliConfig::parse_from(["polyanna"]);
        let mut config = config();
        config.drawing.max_attempts = None;
        cli.apply_to(&mut config);
        assert_eq!(config.max_attempts(), Some(DEFAULT_MAX_ATTEMPTS));
    }

    #[test]
    fn test_unbounded_removes_cap() {
        let cli = CliConfig::parse_from(["polyanna", "--unbounded"]);
        let mut config = config();
        cli.apply_to(&mut config);
        assert_eq!(config.max_attempts(), None);
    }

    #[test]
    fn test_unbounded_conflicts_with_max_attempts() {
        let result =
            CliConfig::try_parse_from(["polyanna", "--unbounded", "--max-attempts", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_overrides() {
        let cli = CliConfig::parse_from([
            "polyanna",
            "--seed",
            "7",
            "--year",
            "2030",
            "--output-path",
            "/tmp/santa",
            "--write-individual",
            "true",
            "--hide-results",
        ]);
        let mut config = config();
        cli.apply_to(&mut config);

        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.year(), 2030);
        assert_eq!(config.output_path(), "/tmp/santa");
        assert!(config.write_individual());
        assert!(!config.console_enabled());
        assert!(!config.write_full());
    }
}
