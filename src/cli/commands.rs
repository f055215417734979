use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve the latest build version of components from Jenkins
#[derive(Parser, Debug)]
#[command(
    name = "buildscout",
    about = "Resolve the latest build version of components from Jenkins",
    version,
    author,
    long_about = "buildscout finds the Jenkins job for each component through the search \
                  endpoint, reads the console log of its last build and extracts the version \
                  number. Results are written to a flat text report and echoed to the console."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress progress output and only log errors"
    )]
    pub quiet: bool,

    #[arg(
        short = 'c',
        long,
        global = true,
        value_name = "FILE",
        help = "Path to a TOML config file (defaults to ./buildscout.toml if present)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Resolve versions for a list of components",
        long_about = "Looks up the Jenkins job of every component in order, extracts the version \
                      from its last build log and writes the report.\n\n\
                      Examples:\n  \
                      buildscout resolve foo-svc bar-svc\n  \
                      buildscout resolve --components-file components.txt\n  \
                      buildscout resolve -o versions.txt --jenkins-url https://ci.example.com/"
    )]
    Resolve(ResolveArgs),

    #[command(
        about = "Print the Jenkins job address found for a component",
        long_about = "Runs only the job search for one component and prints the resulting job \
                      address.\n\n\
                      Examples:\n  \
                      buildscout locate foo-svc"
    )]
    Locate(LocateArgs),

    #[command(about = "List the active version extraction rules in priority order")]
    Rules,
}

/// Connection overrides shared by commands that talk to Jenkins
#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
    #[arg(long, value_name = "URL", help = "Jenkins base URL")]
    pub jenkins_url: Option<String>,

    #[arg(
        short = 'u',
        long,
        value_name = "USER",
        help = "Jenkins user name (the API token is read from BUILDSCOUT_JENKINS_TOKEN or the config file)"
    )]
    pub user: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Per-request timeout in seconds (default: none)")]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct ResolveArgs {
    #[arg(value_name = "COMPONENT", help = "Components to resolve, in report order")]
    pub components: Vec<String>,

    #[arg(
        short = 'f',
        long,
        value_name = "FILE",
        help = "Read components from a file, one per line"
    )]
    pub components_file: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Report file path (default: buildNumbers.txt)"
    )]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct LocateArgs {
    #[arg(value_name = "COMPONENT", help = "Component name to search for")]
    pub component: String,

    #[command(flatten)]
    pub server: ServerArgs,
}
