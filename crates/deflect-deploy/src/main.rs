// crates/deflect-deploy/src/main.rs
//
// Binary entrypoint for the deflect deployment driver.
//
// Parses CLI arguments, loads the deployment plan, initializes tracing,
// applies the plan, optionally replays its steps, and prints a report.

use clap::{Parser, Subcommand};

use deflect_deploy::output::{render_report, render_steps, OutputFormat};
use deflect_deploy::report::build_report;
use deflect_deploy::simulate::run_steps;
use deflect_deploy::{deploy, DeploymentPlan};

/// Deflect staking pools: deploy a plan and inspect the resulting pools.
#[derive(Parser, Debug)]
#[command(name = "deflect", version = "0.1.0", about = "Deflect staking pool deployment driver")]
struct Cli {
    /// Path to the TOML deployment plan.
    #[arg(long, global = true, default_value = "deflect.toml")]
    plan: String,

    /// Output format for reports.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log level override; RUST_LOG takes precedence when set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply the plan's pools and boosts, then report.
    Deploy,
    /// Apply the plan, replay its scripted steps, then report.
    Simulate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let plan = DeploymentPlan::load(&cli.plan)?;
    let log_level = cli.log_level.clone().unwrap_or_else(|| plan.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Loaded deployment plan from {}", cli.plan);
    tracing::info!(
        "Staking asset {} ({} decimals), admin {}",
        plan.engine.staking_asset,
        plan.engine.staking_decimals,
        plan.engine.admin
    );

    let shared = deploy(&plan)?;

    if let Commands::Simulate = cli.command {
        let outcomes = run_steps(&shared, &plan).await;
        let rejected = outcomes.iter().filter(|o| !o.ok).count();
        tracing::info!("Replayed {} steps ({} rejected)", outcomes.len(), rejected);
        println!("{}", render_steps(&outcomes, cli.format)?);
    }

    let engine = shared.read().await;
    let report = build_report(&engine, &plan)?;
    println!("{}", render_report(&report, cli.format)?);

    Ok(())
}
