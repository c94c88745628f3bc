use std::path::PathBuf;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

/// Structure of the main command (crab).
#[allow(unused)]
#[derive(Parser, Debug)]
#[command(
    about = "CRAB, a client for distributed analysis tasks",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// The main command issued.
    #[command(subcommand)]
    pub command: CrabCommand,

    /// Disable styled output, for use in scripts.
    #[arg(short, long, global = true)]
    pub script: bool,

    /// The path to the client configuration [default: ./crab.toml].
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose mode, displays debug info. For even more try: -vv.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Dry run, run but don't actually affect anything.
    #[arg(short, long, global = true)]
    pub dry: bool,

    /// The server deployment to use: prod, preprod or dev.
    #[arg(long, global = true)]
    pub instance: Option<String>,

    /// An explicit server to use, as host[:port].
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// The proxy certificate to authenticate with.
    #[arg(long, global = true)]
    pub proxy: Option<PathBuf>,
}

/// Arguments supplied with the `remake` command.
#[derive(Args, Debug, Clone)]
pub struct RemakeStruct {
    /// The complete task names from glidemon or the dashboard,
    /// separated by commas.
    #[arg(long, value_name = "TASKS")]
    pub cmptask: Option<String>,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments supplied with the `create` command.
#[derive(Args, Debug, Clone)]
pub struct CreateStruct {
    /// The name of the request [default: the current time].
    #[arg(short, long)]
    pub request_name: Option<String>,

    /// The directory in which to create the work area.
    #[arg(short, long)]
    pub work_area: Option<PathBuf>,

    /// The job type of the task.
    #[arg(short, long, default_value = "Analysis")]
    pub job_type: String,

    /// Use the job type provided by this file instead.
    #[arg(long, conflicts_with = "job_type")]
    pub plugin_file: Option<PathBuf>,
}

/// Arguments supplied with the `server-info` command.
#[derive(Args, Debug, Clone)]
pub struct ServerInfoStruct {
    /// The information to ask for.
    #[arg(long, default_value = "backendurls")]
    pub subresource: String,
}

/// Arguments supplied with the `upload-log` command.
#[derive(Args, Debug, Clone)]
pub struct UploadLogStruct {
    /// The work area of the task whose log to upload
    /// [default: crab.log in the current directory].
    #[arg(short, long)]
    pub task: Option<PathBuf>,

    /// The name to store the log under [default: timestamped].
    #[arg(long)]
    pub log_name: Option<String>,
}

/// Enum for root-level `crab` commands.
#[derive(Subcommand, Debug)]
pub enum CrabCommand {
    /// Recreate the local work area of tasks that exist on the server.
    #[command()]
    Remake(RemakeStruct),

    /// Create the work area of a new task.
    #[command()]
    Create(CreateStruct),

    /// Ask the server about itself.
    #[command()]
    ServerInfo(ServerInfoStruct),

    /// Upload a log file for the operators to look at.
    #[command()]
    UploadLog(UploadLogStruct),

    /// Print information about the version.
    #[command()]
    Version,
}
