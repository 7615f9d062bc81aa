use clap::Parser;
use std::path::PathBuf;
use timesheet_rollup::config::{load_config, MalformedRowPolicy};
use timesheet_rollup::{run, RollupError, RunOptions};
use tracing::{debug, error, trace};

/// Weekly hours, SR&ED hours and epic reports from a timesheet export
#[derive(Parser)]
#[command(name = "timesheet-rollup", version)]
#[command(about = "Roll up timesheet records into weekly per-person reports", long_about = None)]
struct Cli {
    /// Timesheet CSV to read (default: configured input, usually data.csv)
    input: Option<PathBuf>,

    /// Directory to write reports into (default: configured, usually reports/)
    output_dir: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Skip rows with an unparseable date or invalid hours instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Also write monthly-hours.csv with per-bucket monthly sums
    #[arg(long)]
    monthly: bool,

    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("timesheet-rollup started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = execute(cli) {
        error!("Fatal error: {}", e);
        let exit_code = match e.downcast_ref::<RollupError>() {
            Some(rollup) => {
                debug!("{}", rollup.describe());
                rollup.exit_code()
            }
            None => 1,
        };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.skip_malformed {
        config.on_malformed_row = MalformedRowPolicy::Skip;
    }

    let options = RunOptions::resolve(&config, cli.input, cli.output_dir, cli.monthly);
    let summary = run(&config, &options)?;

    println!("{}", summary.stats);
    println!("Reports written to {}", options.output_dir.display());
    Ok(())
}
