use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reward_tally::run::{RunConfig, RunSummary, run as run_aggregation};
use reward_tally::sources::SourceTable;
use reward_tally::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Aggregate(args) => execute_aggregate(args),
    }
}

fn execute_aggregate(args: AggregateArgs) -> Result<()> {
    if !args.input_dir.is_dir() {
        return Err(ToolError::MissingInput(args.input_dir));
    }

    let config = RunConfig {
        sources: SourceTable::from_directory(&args.input_dir, &args.round),
        token_price_usd: args.token_price,
        onchain_output: args.onchain_output,
        display_output: args.display_output,
    };
    let summary = run_aggregation(&config)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Done!");
    println!("Token price set at {} USD", summary.token_price_usd);
    println!(
        "Total reward in smallest unit: {}",
        summary.total_reward_amount
    );
    println!(
        "Total reward: {} tokens (~{:.2} USD) across {} addresses",
        summary.total_tokens(),
        summary.total_usd(),
        summary.address_count
    );
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Aggregate partitioned reward exports into distribution and display artifacts."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate the eight reward exports of one round.
    Aggregate(AggregateArgs),
}

#[derive(clap::Args)]
struct AggregateArgs {
    /// Token price in USD used to convert prizes into token amounts.
    #[arg(long, env = "TOKEN_PRICE_USD")]
    token_price: f64,

    /// Directory holding the reward exports.
    #[arg(long, default_value = "csvs")]
    input_dir: PathBuf,

    /// Round tag appended to every export file name.
    #[arg(long, default_value = "0424")]
    round: String,

    /// Output path of the on-chain distribution table.
    #[arg(long, default_value = "forSC.json")]
    onchain_output: PathBuf,

    /// Output path of the front-end display table.
    #[arg(long, default_value = "forFE.json")]
    display_output: PathBuf,
}
