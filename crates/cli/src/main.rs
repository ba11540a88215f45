mod config_commands;
mod console;
mod normalize_commands;
mod run_commands;

use std::path::PathBuf;

use {
    chainchat_config::ChainchatConfig,
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "chainchat", about = "Chainchat: wallet chat to AI agent bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of ./chainchat.toml and the user config dir).
    #[arg(long, global = true, env = "CHAINCHAT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bridge until shutdown or until the stream gives up.
    Run {
        /// Read events as JSON lines from stdin and write sends to stdout.
        #[arg(long)]
        stdio: bool,
    },
    /// Normalize tool results into transaction batches and print them.
    Normalize(normalize_commands::NormalizeArgs),
    /// Validate the configuration and report errors/warnings.
    CheckConfig,
}

/// Logs go to stderr so stdout stays free for command output.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ChainchatConfig> {
    match path {
        Some(path) => {
            let mut config = chainchat_config::load_config(path)?;
            chainchat_config::apply_env_overrides(&mut config, |name| std::env::var(name).ok());
            Ok(config)
        },
        None => Ok(chainchat_config::discover_and_load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "chainchat starting");

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run { stdio } => run_commands::handle_run(config, stdio).await,
        Commands::Normalize(args) => normalize_commands::handle_normalize(&config, args).await,
        Commands::CheckConfig => config_commands::handle_check(&config),
    }
}
