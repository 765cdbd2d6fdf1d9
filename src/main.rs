use clap::Parser;
use player_story::app::run_once;
use player_story::core::ConfigProvider;
use player_story::utils::{logger, validation::Validate};
use player_story::{CliConfig, OpenAiGenerator, StoryError, TerminalApp, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting player-story");

    let config: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut toml = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            toml.apply_api_key_fallback(cli.api_key.clone());
            if let Err(e) = toml.validate() {
                exit_with(&e);
            }
            Box::new(toml)
        }
        None => {
            if let Err(e) = cli.validate() {
                exit_with(&e);
            }
            Box::new(cli.clone())
        }
    };

    tracing::info!("✅ Configuration loaded: model {} at {}", config.model(), config.endpoint());

    let generator = match OpenAiGenerator::from_config(config.as_ref()) {
        Ok(generator) => generator,
        Err(e) => exit_with(&e),
    };

    if let Some(form) = cli.form_input() {
        let code = run_once(
            form,
            &generator,
            &mut std::io::stdout(),
            &mut std::io::stderr(),
        )
        .await?;
        std::process::exit(code);
    }

    let mut app = TerminalApp::new(
        std::io::stdin().lock(),
        std::io::stdout(),
        generator,
        config.title(),
    );
    app.run().await?;

    Ok(())
}

fn exit_with(e: &StoryError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
