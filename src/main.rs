use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::sync::RwLock;

use rampage_bot::application::services::{CommandExtensions, CommandService};
use rampage_bot::domain::traits::Bot;
use rampage_bot::infrastructure::adapters::ConsoleAdapter;
use rampage_bot::infrastructure::config::Config;
use rampage_bot::modules::builtin::{self, example::ExampleModule, ESSENTIAL_MODULES};
use rampage_bot::modules::ModuleManager;

#[derive(Parser)]
#[command(name = "rampage-bot")]
#[command(about = "A modular chat bot host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config);
        }
        Commands::Version => {
            println!("rampage-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting rampage-bot: {}", config.bot.name);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let bot = Arc::new(ConsoleAdapter::new());

        // Command service with base commands, shared with the extension loader
        let service = Arc::new(RwLock::new(CommandService::new(&config.bot.prefix)));
        if let Err(e) = service.write().await.register_defaults() {
            tracing::error!("Failed to register base commands: {}", e);
            std::process::exit(1);
        }

        let extensions = Arc::new(
            CommandExtensions::new(service.clone())
                .provide(builtin::example::NAME, ExampleModule::commands()),
        );

        let registry = match builtin::builtin_registry() {
            Ok(registry) => registry,
            Err(e) => {
                tracing::error!("Module registration failed: {}", e);
                std::process::exit(1);
            }
        };

        let manager = ModuleManager::new(
            registry,
            bot.clone(),
            extensions,
            ESSENTIAL_MODULES.iter().map(|s| s.to_string()).collect(),
            config.tenants.clone(),
        );

        // Any lifecycle error at startup is fatal
        if let Err(e) = manager.enable_modules(&config.modules.enabled).await {
            tracing::error!("Error during bot startup: {}", e);
            std::process::exit(1);
        }

        let info = bot.bot_info();
        tracing::info!(
            "Bot started: @{} with modules: {}",
            info.username,
            manager.active_modules().await.join(", ")
        );

        run_console(&config, bot.as_ref(), &service, &manager).await;

        manager.shutdown().await;
    });
}

async fn run_console(
    config: &Config,
    bot: &ConsoleAdapter,
    service: &Arc<RwLock<CommandService>>,
    manager: &ModuleManager,
) {
    let tenant_id = config
        .adapters
        .console
        .as_ref()
        .and_then(|c| c.tenant_id);

    // Main loop (for console mode)
    loop {
        let Some(input) = bot.read_line("> ").await else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        let service = service.read().await;
        let message = service.parse("console", input, tenant_id);
        match service.dispatch(manager, &message).await {
            Ok(Some(response)) => {
                let _ = bot.send_message("console", &response).await;
            }
            Ok(None) => {
                if let Some(text) = message.content.text() {
                    let _ = bot.send_message("console", &format!("Echo: {}", text)).await;
                }
            }
            Err(e) => {
                let _ = bot.send_message("console", &format!("Error: {}", e)).await;
            }
        }
    }
}

fn init_config() {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => {
            tracing::error!("Failed to serialize default config: {}", e);
        }
    }
}
