use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tripwire_core::{config::Config, FrameworkVersion, Normalizer, TracingNotifier};

#[derive(Parser)]
#[command(name = "tripwire", about = "Tripwire: request event normalization and channel failure reporting")]
struct Cli {
    /// Write debug logs to /tmp/tripwire-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    /// Read configuration from this file instead of ~/.config/tripwire/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize JSON-lines raw events from stdin, one JSON event per line on stdout.
    Replay {
        /// Host framework version (`major.minor`), overriding the config file.
        #[arg(long)]
        framework_version: Option<FrameworkVersion>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/tripwire-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("tripwire debug log started, tail -f /tmp/tripwire-debug.log");
    }

    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to built-in config");
            Config::defaults()
        }),
    };

    match cli.command {
        Command::Replay { framework_version } => {
            if let Some(version) = framework_version {
                config.framework.version = version;
            }
            let normalizer = Normalizer::from_config(&config);
            let notifier = TracingNotifier::from_config(&config.notifier);
            let stats = tripwire::replay::replay(&normalizer, io::stdin().lock(), io::stdout().lock())
                .inspect_err(|err| tripwire::replay::report_failure(&notifier, err))?;
            tracing::info!(events = stats.events, skipped = stats.skipped, "replay complete");
        }
    }

    Ok(())
}
