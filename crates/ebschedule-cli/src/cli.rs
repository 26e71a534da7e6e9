use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ebschedule",
    about = "Update and diff schedules of the event scheduler",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with [client] and [normalize] settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Scheduler service base URL
    #[arg(long, global = true, env = "EBSCHEDULE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Region used to derive the service URL
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show changes between the deployed schedule and a schedule file
    Diff(DiffArgs),
    /// Create or update a schedule from a schedule file
    Update(UpdateArgs),
    /// Show version
    Version,
}

#[derive(Args)]
pub struct DiffArgs {
    /// path/to/schedule.yaml
    #[arg(long)]
    pub schedule: PathBuf,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// path/to/schedule.yaml
    #[arg(long)]
    pub schedule: PathBuf,
    /// Create the schedule group if it does not exist
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
    )]
    pub create_schedule_group: bool,
}
