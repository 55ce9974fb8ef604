#![cfg(feature = "cli")]

use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_config(dir: &Path, exclusions: [&str; 3]) -> Result<String> {
    let normalized_path = dir.join("Results").to_string_lossy().replace('\\', "/");
    let content = format!(
        r#"
[drawing]
name = "Book Club"
year = 2026
seed = 3

[[participants]]
name = "Ann"
exclusions = [{}]

[[participants]]
name = "Bob"
exclusions = [{}]

[[participants]]
name = "Cy"
exclusions = [{}]

[output]
path = "{}"
write_full = true
write_individual = true
"#,
        exclusions[0], exclusions[1], exclusions[2], normalized_path
    );
    let path = dir.join("polyanna.toml");
    std::fs::write(&path, content)?;
    Ok(path.to_string_lossy().into_owned())
}

fn polyanna(args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_polyanna")).args(args).output()?)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_successful_drawing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = write_config(temp_dir.path(), ["", "", ""])?;

    let output = polyanna(&["--config", &config])?;

    assert_eq!(output.status.code(), Some(0));
    let printed = stdout(&output);
    assert!(printed.starts_with("Success. You are awesome.\n"));
    assert_eq!(printed.matches(" --> ").count(), 3);
    assert!(printed.contains("Fail Count: "));
    assert!(temp_dir.path().join("Results/full_results.txt").exists());
    assert!(temp_dir.path().join("Results/Individual_Results/Cy.txt").exists());
    Ok(())
}

#[test]
fn test_cli_infeasible_drawing_exits_with_two() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = write_config(temp_dir.path(), [r#""Bob", "Cy""#, "", ""])?;

    let output = polyanna(&["--config", &config, "--max-attempts", "40"])?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "Fail Count: 40\n");
    assert!(!temp_dir.path().join("Results").exists());
    Ok(())
}

#[test]
fn test_cli_dry_run_draws_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = write_config(temp_dir.path(), [r#""Bob""#, "", ""])?;

    let output = polyanna(&["--config", &config, "--dry-run"])?;

    assert_eq!(output.status.code(), Some(0));
    let printed = stdout(&output);
    assert!(printed.contains("Ann: 1 eligible recipients"));
    assert!(printed.contains("Attempt limit: 100000"));
    assert!(!printed.contains("Success"));
    assert!(!temp_dir.path().join("Results").exists());
    Ok(())
}

#[test]
fn test_cli_write_failure_exits_with_one_and_leaves_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = write_config(temp_dir.path(), ["", "", ""])?;
    let results = temp_dir.path().join("Results");
    std::fs::create_dir_all(&results)?;
    std::fs::write(results.join("Individual_Results"), "in the way")?;

    let output = polyanna(&["--config", &config])?;

    assert_eq!(output.status.code(), Some(1));
    let printed = stdout(&output);
    assert!(!printed.contains("Success"));
    assert!(!printed.contains(" --> "));
    assert!(printed.contains("Fail Count: "));
    assert!(!results.join("full_results.txt").exists());
    Ok(())
}

#[test]
fn test_cli_missing_config_exits_with_one() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("nope.toml");

    let output = polyanna(&["--config", &missing.to_string_lossy()])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    Ok(())
}
