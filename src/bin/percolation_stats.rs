//! Command-line driver: runs Monte Carlo percolation trials and prints
//! the threshold estimate.

use clap::{Parser, ValueEnum};
use tracing::error;

use u_percolation::simulation::{
    PercolationStats, Sampling, SimulationSettingsBuilder, DEFAULT_GRID_SIZE, DEFAULT_SEED,
    DEFAULT_TRIALS,
};

/// Command-line names for [`Sampling`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SamplingArg {
    /// Draw uniformly from all sites each step, repeats included
    WithReplacement,
    /// Open the sites of one random permutation in order
    Permutation,
}

impl From<SamplingArg> for Sampling {
    fn from(arg: SamplingArg) -> Self {
        match arg {
            SamplingArg::WithReplacement => Sampling::WithReplacement,
            SamplingArg::Permutation => Sampling::Permutation,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid dimension n
    #[arg(default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: usize,

    /// Number of independent trials
    #[arg(default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Run seed; each trial derives its own generator from it
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Site selection strategy
    #[arg(long, value_enum, default_value_t = SamplingArg::WithReplacement)]
    sampling: SamplingArg,

    /// Run trials in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let settings = SimulationSettingsBuilder::default()
        .grid_size(args.grid_size)
        .trials(args.trials)
        .seed(args.seed)
        .sampling(args.sampling.into())
        .parallel(args.parallel)
        .build()
        .inspect_err(|e| error!("invalid settings: {e}"))?;

    let stats = PercolationStats::run(&settings)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats.report())?);
    } else {
        println!("mean                    = {}", stats.mean());
        println!("stddev                  = {}", stats.stddev());
        println!(
            "95% confidence interval = [{}, {}]",
            stats.confidence_lo(),
            stats.confidence_hi()
        );
    }
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let format = fmt::format().with_target(true).compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("u_percolation=info,percolation_stats=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
