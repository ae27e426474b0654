mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use walkin_core::events::{EventSink, TracingSink};
use walkin_core::{Comparison, ExperimentConfig};

use crate::console::ConsoleSink;

#[derive(Parser)]
#[command(
    name = "walkin",
    about = "Walk-in experiment: does a vacant/occupied sign change how often people walk in on each other?",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Number of paired (signaling off, signaling on) trials
    #[arg(long, default_value = "1", global = true)]
    trials: usize,

    /// Base seed for the actors' random sources
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// JSON file overriding the default constants
    #[arg(long, env = "WALKIN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Do not print per-actor event lines
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print the full comparison report as JSON instead of the summary
    #[arg(long, global = true)]
    json: bool,

    /// More diagnostics on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the off/on comparison (default)
    Run,

    /// Print the effective configuration as JSON
    Config,

    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Run => run(&cli).await,
        Commands::Config => {
            let config = load_config(&cli)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Version => {
            println!("walkin {}", env!("CARGO_PKG_VERSION"));
            println!("Walk-in conflict experiment with and without occupancy signaling");
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<ExperimentConfig> {
    let mut config = match &cli.config {
        Some(path) => ExperimentConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from '{}'", path.display()))?,
        None => ExperimentConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    let sink: Arc<dyn EventSink> = if cli.quiet || cli.json {
        Arc::new(TracingSink)
    } else {
        Arc::new(ConsoleSink)
    };

    let comparison = Comparison::new(config).trials(cli.trials).sink(sink);

    let interrupts = comparison.interrupt_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping actors");
            interrupts.interrupt_all();
        }
    });

    let report = comparison.run().await.context("Experiment failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in console::summary_lines(&report) {
            println!("{}", line);
        }
    }

    Ok(())
}
