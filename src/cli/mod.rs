pub mod errors;
pub mod tracing_init;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "scalr",
    version,
    about = "Command-line interface generated from the Scalr API schema",
    long_about = "Every operation of the Scalr API schema is available as a command.\n\
                  Request attributes and relationships become flags; paginated\n\
                  responses are fetched completely and printed as flat JSON records.\n\n\
                  Examples:\n  \
                  scalr --list                                  # Show all commands\n  \
                  scalr --describe create-workspace             # Show the flags of a command\n  \
                  scalr create-workspace -name=ws -environment-id=env-1\n  \
                  scalr update-workspace -workspace=ws-1 < body.json"
)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Increase logging verbosity (-v for debug, -vv for trace)"
    )]
    pub verbosity: u8,

    /// Output all errors as structured JSON to stderr
    #[arg(long, help = "Output errors in JSON format")]
    pub json_errors: bool,

    /// List every command grouped by resource
    #[arg(long, conflicts_with = "describe", help = "List available commands")]
    pub list: bool,

    /// Show the flags of one command
    #[arg(long, value_name = "COMMAND", help = "Show the flags of a command")]
    pub describe: Option<String>,

    /// Download the schema even if the cached copy is still fresh
    #[arg(long, help = "Refresh the cached API schema")]
    pub refresh_schema: bool,

    /// Command name, as shown by --list
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Command flags such as `-name=value`; parsed against the schema
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "FLAGS")]
    pub args: Vec<String>,
}
