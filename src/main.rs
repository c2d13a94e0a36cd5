use clap::Parser;
use smallkit::app::session;
use smallkit::config::Command;
use smallkit::domain::model::CipherKey;
use smallkit::utils::error::{ErrorSeverity, KitError};
use smallkit::utils::prompt::Console;
use smallkit::utils::{logger, validation::Validate};
use smallkit::{CliConfig, KitConfig, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match KitConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config: {}", e.user_friendly_message());
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.base_dir().to_string());

    match run(&cli.command, &config, storage).await {
        Ok(location) => {
            tracing::info!("📁 Output: {}", location);
        }
        Err(KitError::AbortedError) => {
            tracing::info!("Stopped by user");
        }
        Err(e) => {
            tracing::error!(
                "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
                command_name(&cli.command),
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Cipher(_) => "cipher",
        Command::Climate(_) => "climate",
        Command::Tree(_) => "tree",
    }
}

async fn run(command: &Command, config: &KitConfig, storage: LocalStorage) -> smallkit::Result<String> {
    match command {
        Command::Cipher(args) => {
            let fixed_key = match (args.n, args.m) {
                (Some(n), Some(m)) => Some(CipherKey::new(n, m)),
                (None, None) => None,
                _ => {
                    return Err(KitError::InvalidInputError {
                        message: "--n and --m must be given together".to_string(),
                    })
                }
            };

            let mut console = Console::stdio();
            let runs =
                session::run_cipher_session(&mut console, storage, config.cipher.clone(), fixed_key)
                    .await?;
            tracing::debug!("Cipher session finished after {} run(s)", runs);
            Ok(config.cipher.encrypted_file.clone())
        }
        Command::Climate(_) => {
            let mut console = Console::stdio();
            session::run_climate_session(&mut console, storage, config.climate.clone()).await
        }
        Command::Tree(_) => {
            let mut console = Console::stdio();
            session::run_tree_session(&mut console, storage, &config.tree).await
        }
    }
}
