use clap::Parser;
use polyanna::app::run::run_drawing;
use polyanna::utils::{logger, validation::Validate};
use polyanna::{CliConfig, DrawError, LocalStorage, TomlConfig};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🎁 Starting polyanna");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    args.apply_to(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let history_file = match &args.history {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            let config_dir = Path::new(&args.config)
                .parent()
                .unwrap_or_else(|| Path::new("."));
            config.history_file(config_dir)
        }
    };

    let storage = LocalStorage::new(config.output_path());
    let mut stdout = std::io::stdout();
    if let Err(e) = run_drawing(&config, history_file.as_deref(), args.dry_run, storage, &mut stdout).await {
        exit_with(&e);
    }

    Ok(())
}

fn exit_with(e: &DrawError) -> ! {
    tracing::error!(
        "❌ Drawing failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
