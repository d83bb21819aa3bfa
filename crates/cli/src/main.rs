//! ddicheck command line entry point.
//!
//! With drug names on the command line, runs one check and prints the report.
//! Without them, starts an interactive session on stdin.

use anyhow::Result;
use clap::Parser;
use ddicheck_client::{Checker, Session, render_json, render_report};
use ddicheck_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod interactive;

/// Drug interaction checker
#[derive(Parser, Debug)]
#[command(name = "ddicheck")]
#[command(version)]
#[command(about = "Check drug interactions for a list of medications", long_about = None)]
pub struct Cli {
    /// Medication names, comma-separated. Omit to start an interactive session.
    pub drugs: Vec<String>,

    /// Print results as JSON instead of a text report.
    #[arg(long)]
    pub json: bool,

    /// Number of drugs looked up at once (1-16).
    #[arg(long, short = 'c')]
    pub concurrency: Option<usize>,
}

impl Cli {
    /// Apply command line overrides on top of loaded configuration.
    fn apply(&self, mut config: AppConfig) -> Result<AppConfig> {
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::load()?)?;
    let checker = Checker::from_config(&config)?;

    if cli.drugs.is_empty() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        return interactive::run(Session::new(checker), stdin, &mut stdout, cli.json).await;
    }

    tracing::debug!(drugs = ?cli.drugs, "running one-shot check");

    let batch = checker.check(&cli.drugs.join(",")).await;
    if cli.json {
        println!("{}", render_json(&batch));
    } else {
        print!("{}", render_report(&batch));
    }

    Ok(())
}
