mod cli;
mod config;
mod datasources;
mod delivery;
mod error;
mod logic;
mod models;
mod render;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use datasources::QWeatherClient;
use logic::{DispatchService, RulesEngine, Scheduler};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .init();

    let command = cli.command();

    // Load configuration, offering setup on first launch
    let config = if command == Commands::Init
        || (cli.config.is_none() && !Config::exists(None))
    {
        let (config, path) = Config::setup_interactive(cli.config.clone())?;
        println!("Config written to {}", path.display());
        config
    } else {
        Config::load(cli.config.clone()).context("Configuration error")?
    };

    match command {
        Commands::Init => {}
        Commands::Check => check(&config).await?,
        Commands::Send => {
            let dispatch = DispatchService::from_config(&config)?;
            let report = dispatch.run_cycle().await?;
            println!("Sent: {}  Failed: {}", report.sent, report.failed);
            if report.failed > 0 && !report.succeeded() {
                std::process::exit(1);
            }
        }
        Commands::Preview { output } => {
            let dispatch = DispatchService::from_config(&config)?;
            let content = dispatch.compose_now().await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &content.html)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Subject: {}", content.subject);
                    println!("Preview written to {}", path.display());
                }
                None => {
                    println!("Subject: {}", content.subject);
                    println!();
                    println!("{}", content.html);
                }
            }
        }
        Commands::Run => {
            let times = config.schedule.parsed_times()?;
            let dispatch = DispatchService::from_config(&config)?;
            let mut scheduler = Scheduler::new(dispatch, &times);
            scheduler.run().await?;
        }
    }

    Ok(())
}

async fn check(config: &Config) -> anyhow::Result<()> {
    println!("Config: {:?}", config.weather);

    let problems = config.validate();
    for problem in &problems {
        println!("  [WARN] {}", problem);
    }
    if problems.is_empty() {
        println!("  Config OK");
    }

    let engine = RulesEngine::new(config.keywords.clone(), config.advice.closing_rule());
    println!("Advice rules:");
    for (id, name) in engine.list_rules() {
        println!("  {:<18} {}", id, name);
    }

    let client = QWeatherClient::new(config.weather.clone())?;
    match client.test_connection().await {
        Ok(true) => println!("QWeather: OK"),
        Ok(false) => println!("QWeather: API returned an error code"),
        Err(e) => println!("QWeather: OFFLINE ({})", e),
    }

    Ok(())
}
