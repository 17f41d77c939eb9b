mod cli;
mod dataset;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use refguard_core::config::{load_dotenv, parse_max_concurrency};
use refguard_core::{EngineConfig, EntityState};
use refguard_engine::{Scheduler, SchedulerConfig, ValidationPass};

use crate::cli::{CliArgs, Command, ReportFormat};
use crate::dataset::Dataset;

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = CliArgs::parse();

    let mut config = EngineConfig::from_env().context("failed to load configuration")?;
    if let Some(raw) = args.max_concurrency.as_deref() {
        config.max_concurrency =
            parse_max_concurrency(raw).context("invalid --max-concurrency")?;
    }

    // Logs go to stderr so reports on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    config.log_summary();

    let scheduler = Scheduler::new(SchedulerConfig::from(&config))?;

    // Ctrl-C stops dispatch; the pass drains and reports what was left.
    let signal = scheduler.shutdown_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping validation");
            signal.send_replace(true);
        }
    });

    match args.command {
        Command::Validate { dataset } => {
            let data = Dataset::load(&dataset)
                .with_context(|| format!("failed to load dataset {}", dataset.display()))?;
            let (references, entities, split_map) = data.into_parts();
            let pass = scheduler.validate_all(references, entities, split_map).await?;
            print_pass(&pass, args.format)?;
        }
        Command::Demo => {
            let mut data = dataset::demo();
            if args.format == ReportFormat::Text {
                println!("Before validation:");
                println!("{}", report::render_references(&data.references));
            }

            // Entity 1 splits into its two aspects.
            if let Some(man) = data.entities.iter_mut().find(|e| e.id == 1) {
                man.state = EntityState::Split;
            }
            info!("Entity 1 marked as Split");

            let (references, entities, split_map) = data.into_parts();
            let pass = scheduler.validate_all(references, entities, split_map).await?;
            if args.format == ReportFormat::Text {
                println!("\nAfter validation:");
            }
            print_pass(&pass, args.format)?;
        }
    }

    Ok(())
}

/// Filter from the configured directive; an unparsable one falls back to `info`.
fn env_filter(config: &EngineConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!("ignoring log filter {:?}: {}", config.log_filter, e);
        EnvFilter::new("info")
    })
}

fn print_pass(pass: &ValidationPass, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => println!("{}", report::render_text(pass)),
        ReportFormat::Json => println!(
            "{}",
            report::render_json(pass).context("failed to serialize report")?
        ),
    }
    Ok(())
}
