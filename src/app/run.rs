use crate::app::report::{render_lines, OutputPlan, ResultReporter};
use crate::config::TomlConfig;
use crate::core::engine::DrawingEngine;
use crate::core::registry::Registry;
use crate::core::{DrawOutcome, DrawSettings, Storage};
use crate::utils::error::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::Path;

pub const SUCCESS_LINE: &str = "Success. You are awesome.";

/// What a finished run did.
#[derive(Debug)]
pub enum RunReport {
    DryRun,
    Completed {
        outcome: DrawOutcome,
        written: Vec<String>,
    },
}

/// Registry from the roster, static exclusions and history.
pub fn prepare_registry(config: &TomlConfig, history_file: Option<&Path>) -> Result<Registry> {
    let mut registry = Registry::build(config.roster(), &config.static_exclusions())?;
    let history = config.load_history(history_file)?;
    registry.merge_all_history(&history)?;
    tracing::info!(
        "👥 {} participants, {} history records",
        registry.len(),
        history.len()
    );

    for name in registry.unreachable_participants() {
        tracing::warn!(
            "⚠️ {} has nobody left to give to; this drawing cannot complete",
            name
        );
    }
    Ok(registry)
}

/// 執行一次完整抽籤並寫出結果
///
/// User-facing lines go to `out`. The success line is only printed once every
/// requested file has been written; `Fail Count` is printed whenever the
/// engine ran, including when it gave up or the output could not be written.
pub async fn run_drawing<S: Storage, W: Write>(
    config: &TomlConfig,
    history_file: Option<&Path>,
    dry_run: bool,
    storage: S,
    out: &mut W,
) -> Result<RunReport> {
    let registry = prepare_registry(config, history_file)?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No drawing will take place");
        write_dry_run(config, &registry, out)?;
        return Ok(RunReport::DryRun);
    }

    let rng = match config.seed() {
        Some(seed) => {
            tracing::info!("🎲 Using seed {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    };

    let mut engine = DrawingEngine::new(registry, rng);
    match config.max_attempts() {
        Some(max) => engine = engine.with_max_attempts(max),
        None => tracing::warn!("No attempt limit set; infeasible exclusions will never finish"),
    }

    let outcome = match engine.run_until_completed() {
        Ok(outcome) => outcome,
        Err(e) => {
            writeln!(out, "Fail Count: {}", engine.failures())?;
            return Err(e);
        }
    };

    let plan = OutputPlan::from(config);
    let reporter = ResultReporter::new(storage, config.drawing_name(), config.year());
    let written = if plan.is_empty() {
        Vec::new()
    } else {
        tracing::info!("📁 Writing results to: {}", config.output_path());
        match reporter.write_outputs(&outcome, &plan).await {
            Ok(written) => written,
            Err(e) => {
                writeln!(out, "Fail Count: {}", outcome.failures)?;
                return Err(e);
            }
        }
    };

    writeln!(out, "{}", SUCCESS_LINE)?;
    if config.console_enabled() {
        write!(out, "{}", render_lines(&outcome.assignment))?;
    }
    writeln!(out, "Fail Count: {}", outcome.failures)?;

    Ok(RunReport::Completed { outcome, written })
}

fn write_dry_run<W: Write>(config: &TomlConfig, registry: &Registry, out: &mut W) -> Result<()> {
    writeln!(out, "Drawing: {} ({})", config.drawing_name(), config.year())?;
    match config.max_attempts() {
        Some(max) => writeln!(out, "Attempt limit: {}", max)?,
        None => writeln!(out, "Attempt limit: none")?,
    }
    for participant in registry.participants() {
        writeln!(
            out,
            "{}: {} eligible recipients",
            participant.name,
            registry.eligible_count(participant)
        )?;
    }
    if config.writes_files() {
        writeln!(out, "Output directory: {}", config.output_path())?;
    }
    Ok(())
}
