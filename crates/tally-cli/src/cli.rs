use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally: a tiny leaderboard backend",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Score file, overriding the configuration
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Show the leaderboard
    Scores(ScoresArgs),
    /// Record a score
    Submit(SubmitArgs),
    /// Create the score file, or repair it if corrupt
    Check,
    /// Delete every recorded score
    Reset(ResetArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Leaderboard length served by GET /scores
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Args)]
pub struct ScoresArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, allow_negative_numbers = true)]
    pub score: i64,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm the reset
    #[arg(long)]
    pub yes: bool,
}
