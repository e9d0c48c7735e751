use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "redoxmc - Monte Carlo simulation of proteoform redox dynamics across a population of protein molecules.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a redox Monte Carlo simulation and write the result tables.
    Simulate(SimulateArgs),
    /// Enumerate the proteoform space for R sites and print its k-grade table.
    Enumerate(EnumerateArgs),
    /// Recompute summary statistics from a previously written occupancy table.
    Summarize(SummarizeArgs),
}

/// Arguments for the `simulate` subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    // --- Core Arguments ---
    /// Path to the simulation configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Directory that receives the result tables.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// State table (CSV) to load instead of the one named in the config file.
    #[arg(short = 't', long, value_name = "PATH")]
    pub table: Option<PathBuf>,

    // --- Simulation Overrides ---
    /// Override the number of molecules (N).
    #[arg(short = 'n', long, value_name = "INT")]
    pub molecules: Option<usize>,

    /// Override the number of time steps (T).
    #[arg(short = 's', long, value_name = "INT")]
    pub steps: Option<usize>,

    /// Override the master random seed.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the initial proteoform (label, or a 0/1 string with one digit per site).
    #[arg(long, value_name = "STATE")]
    pub initial_state: Option<String>,

    /// Override the zero-based index of the catalytic site.
    #[arg(long, value_name = "INT")]
    pub catalytic_site: Option<usize>,

    /// Let reduction compete with oxidation already in the first step.
    #[arg(long)]
    pub allow_first_step_reduction: bool,

    /// Skip writing the full N x (T+1) trajectory table.
    #[arg(long)]
    pub no_trajectory: bool,

    /// Number of most occupied proteoforms to print in the summary.
    #[arg(long, value_name = "INT", default_value_t = 10)]
    pub top: usize,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S probabilities.oxidation-other=0.05
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `enumerate` subcommand.
#[derive(Args, Debug)]
pub struct EnumerateArgs {
    /// Number of modifiable sites (R).
    #[arg(short = 'r', long, required = true, value_name = "INT")]
    pub sites: usize,

    /// Comma-separated site names, one per site (e.g. Cys32,Cys92,...).
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub site_names: Option<Vec<String>>,

    /// Write the generated state table to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `summarize` subcommand.
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// State table (CSV) the occupancy labels refer to.
    #[arg(short = 't', long, required = true, value_name = "PATH")]
    pub table: PathBuf,

    /// Occupancy table written by `simulate`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Zero-based index of the catalytic site to report activation for.
    #[arg(long, value_name = "INT")]
    pub catalytic_site: Option<usize>,

    /// Number of most occupied proteoforms to print.
    #[arg(long, value_name = "INT", default_value_t = 10)]
    pub top: usize,
}
