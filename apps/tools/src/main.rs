use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dispatch_core::{load_settings, load_settings_from, Facade, FailurePolicy};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

use demo::NotificationArg;

#[derive(Parser, Debug)]
struct Cli {
    /// Settings file; defaults to ./dispatch.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    failure_policy: Option<FailurePolicy>,
    #[arg(long)]
    no_pool: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effective settings as JSON.
    Settings,
    /// Send notifications to the counter demo and print the dispatch trace.
    ///
    /// Each argument is `name[:type][=json-body]`, e.g. `increment=5` or `reset:hard`.
    Send {
        #[arg(required = true)]
        notifications: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => load_settings_from(path, |key| std::env::var(key).ok()),
        None => load_settings(),
    };
    if let Some(policy) = cli.failure_policy {
        settings.failure_policy = policy;
    }
    if cli.no_pool {
        settings.pooling_enabled = false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Settings => println!("{}", serde_json::to_string_pretty(&settings)?),
        Command::Send { notifications } => {
            let args = notifications
                .iter()
                .map(|raw| NotificationArg::parse(raw))
                .collect::<Result<Vec<_>>>()?;

            let facade = Facade::with_settings(settings);
            demo::install(&facade)?;
            let trace = demo::run(&facade, &args);
            info!(
                sent = args.len(),
                events = trace.len(),
                pooled = facade.pool().free_len(),
                "demo finished"
            );
            facade.teardown();

            println!("{}", serde_json::to_string_pretty(&trace)?);
        }
    }

    Ok(())
}
