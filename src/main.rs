use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hypothek::api::{self, AnalyzeArgs};
use hypothek::config::load_policy;
use hypothek::error::AppError;
use hypothek::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "hypothek",
    about = "Swiss mortgage affordability and income-risk estimator",
    version
)]
struct Cli {
    /// JSON file overriding lending policy constants
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API
    Serve(ServeArgs),
    /// Analyze one household and print the JSON report
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;
    let policy = load_policy(cli.policy.as_deref())?;

    match cli.command {
        Command::Serve(args) => api::run_http_server(args.port, policy).await?,
        Command::Analyze(args) => {
            let input = api::build_input(args).map_err(AppError::Input)?;
            let response = api::analyze_input(&input, &policy)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
