use buildscout::cli::commands::{CliArgs, Commands};
use buildscout::cli::handlers::{handle_locate, handle_resolve, handle_rules};
use buildscout::util::logging::{init_logging, parse_level, LoggingConfig};
use buildscout::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("buildscout v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let config_path = args.config.as_deref();
    let exit_code = match &args.command {
        Commands::Resolve(resolve_args) => {
            handle_resolve(resolve_args, config_path, args.quiet).await
        }
        Commands::Locate(locate_args) => handle_locate(locate_args, config_path).await,
        Commands::Rules => handle_rules(config_path),
    };

    std::process::exit(exit_code);
}

/// `--log-level` wins, then `-v`/`-q`, then `BUILDSCOUT_LOG_LEVEL`.
fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}
