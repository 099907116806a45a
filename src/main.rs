//! Command line front end for the loan controller. Results go to stdout as
//! JSON, logs go to stderr (`RUST_LOG=fuzzy_loan=debug`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fuzzy_loan::config::EngineConfig;
use fuzzy_loan::loan::reference_applicants;
use fuzzy_loan::{LoanApplication, LoanController};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fuzzy-loan")]
#[command(about = "Fuzzy logic loan approval")]
struct Args {
    /// Engine configuration (JSON); the standard loan rules when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a single application
    Evaluate {
        #[arg(long)]
        credit_score: f64,
        /// Debt-to-income ratio in percent
        #[arg(long)]
        debt_ratio: f64,
        /// Annual income in dollars
        #[arg(long)]
        income: f64,
        /// Years employed
        #[arg(long)]
        employment_duration: f64,
        /// Include fuzzified inputs, rule strengths and aggregated sets
        #[arg(long)]
        diagnostics: bool,
    },
    /// Evaluate a JSON array of applications
    Batch { file: PathBuf },
    /// Evaluate the reference applicants
    Demo,
    /// Print the engine configuration as JSON
    DumpConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let controller = load_controller(args.config.as_deref())?;

    match args.command {
        Command::Evaluate {
            credit_score,
            debt_ratio,
            income,
            employment_duration,
            diagnostics,
        } => {
            let application = LoanApplication {
                credit_score,
                debt_ratio,
                income,
                employment_duration,
            };
            let evaluation = if diagnostics {
                controller.evaluate_with_diagnostics(&application)
            } else {
                controller.evaluate(&application)
            }?;

            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        },
        Command::Batch { file } => {
            let raw = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let applications: Vec<LoanApplication> =
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
            let results: Vec<_> = controller
                .evaluate_batch(&applications)
                .into_iter()
                .map(|result| match result {
                    Ok(evaluation) => json!({ "ok": evaluation }),
                    Err(err) => json!({ "error": err.to_string() }),
                })
                .collect();

            info!(applications = applications.len(), "batch evaluated");

            println!("{}", serde_json::to_string_pretty(&results)?);
        },
        Command::Demo => {
            for (name, application) in reference_applicants() {
                let evaluation = controller.evaluate_with_diagnostics(&application)?;

                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "applicant": name,
                        "inputs": application,
                        "evaluation": evaluation,
                    }))?
                );
            }
        },
        Command::DumpConfig => {
            let config = EngineConfig::from_engine(controller.engine());

            println!("{}", config.to_json_string_pretty()?);
        },
    }

    Ok(())
}

fn load_controller(path: Option<&Path>) -> Result<LoanController> {
    let Some(path) = path else {
        return Ok(LoanController::new()?);
    };

    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let engine = EngineConfig::from_json_str(&raw)
        .and_then(|config| config.build())
        .with_context(|| format!("loading engine configuration from {}", path.display()))?;

    info!(path = %path.display(), rules = engine.rules().len(), "loaded engine configuration");

    Ok(LoanController::with_engine(engine)?)
}
