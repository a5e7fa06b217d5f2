use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "fdjac - parallel forward-model evaluation and brute-force finite-difference Jacobians for CSV-specified linear operators.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the finite-difference Jacobian of a linear operator around a base model.
    Jacobian(JacobianArgs),
    /// Evaluate forward responses for a batch of model vectors.
    Responses(ResponsesArgs),
}

/// Shared evaluation settings for both subcommands.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Path to the operator matrix G (headerless CSV, n_data x n_model).
    #[arg(short = 'G', long, required = true, value_name = "PATH")]
    pub operator: PathBuf,

    /// Path to an evaluator configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the number of concurrently live worker tasks.
    #[arg(short = 'w', long, value_name = "INT")]
    pub workers: Option<usize>,
}

/// Arguments for the `jacobian` subcommand.
#[derive(Args, Debug)]
pub struct JacobianArgs {
    #[command(flatten)]
    pub eval: EvalArgs,

    /// Path to the base model vector (CSV, single row or single column).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub model: PathBuf,

    /// Path for the output Jacobian (headerless CSV, n_data x n_model).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Override the multiplicative perturbation factor from the config file.
    #[arg(short = 'f', long, value_name = "FLOAT")]
    pub factor: Option<f64>,
}

/// Arguments for the `responses` subcommand.
#[derive(Args, Debug)]
pub struct ResponsesArgs {
    #[command(flatten)]
    pub eval: EvalArgs,

    /// Path to the model batch (headerless CSV, one model vector per row).
    #[arg(short = 'M', long, required = true, value_name = "PATH")]
    pub models: PathBuf,

    /// Path for the output responses (headerless CSV, one response per row).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}
