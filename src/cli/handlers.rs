//! Command handlers
//!
//! Each handler returns the process exit code: 0 on success, 1 when the run
//! itself failed and 2 when the configuration was unusable.

use super::commands::{LocateArgs, ResolveArgs, ServerArgs};
use crate::ci::JenkinsClient;
use crate::config::{load_component_file, ConfigError, ScoutConfig};
use crate::coordinator::RunCoordinator;
use crate::locator::JobLocator;
use crate::progress::{ConsoleHandler, FanOutHandler, LoggingHandler};
use crate::report::{ConsoleSink, FileSink, ReportSink};
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

pub async fn handle_resolve(args: &ResolveArgs, config_path: Option<&Path>, quiet: bool) -> i32 {
    info!("Starting version resolution");
    match resolve(args, config_path, quiet).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

pub async fn handle_locate(args: &LocateArgs, config_path: Option<&Path>) -> i32 {
    match locate(args, config_path).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

pub fn handle_rules(config_path: Option<&Path>) -> i32 {
    match list_rules(config_path) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

/// Maps an error chain to an exit code; any [`ConfigError`] in it means 2.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err
        .chain()
        .any(|cause| cause.downcast_ref::<ConfigError>().is_some())
    {
        EXIT_CONFIG_ERROR
    } else {
        EXIT_FAILURE
    }
}

fn report_failure(err: &anyhow::Error) -> i32 {
    let code = exit_code_for(err);
    error!("{:#}", err);
    eprintln!("Error: {:#}", err);
    if code == EXIT_CONFIG_ERROR {
        eprintln!("\nPlease check your config file, environment variables and command-line arguments.");
    }
    code
}

/// Loads the layered configuration and applies the connection flags on top.
pub fn load_config(config_path: Option<&Path>, server: &ServerArgs) -> Result<ScoutConfig> {
    let mut config = ScoutConfig::load(config_path)?;
    apply_server_args(&mut config, server);
    Ok(config)
}

fn apply_server_args(config: &mut ScoutConfig, server: &ServerArgs) {
    if let Some(url) = &server.jenkins_url {
        debug!("Jenkins URL overridden to: {}", url);
        config.jenkins.url = url.clone();
    }
    if let Some(user) = &server.user {
        config.jenkins.username = user.clone();
    }
    if let Some(timeout) = server.timeout {
        config.jenkins.request_timeout_secs = Some(timeout);
    }
}

/// Component list precedence: config file, then `--components-file`, then
/// positional arguments.
fn apply_resolve_args(config: &mut ScoutConfig, args: &ResolveArgs) -> Result<()> {
    if let Some(file) = &args.components_file {
        config.components = load_component_file(file)?;
        debug!(
            "Loaded {} components from {}",
            config.components.len(),
            file.display()
        );
    }
    if !args.components.is_empty() {
        config.components = args.components.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    Ok(())
}

fn jenkins_client(config: &ScoutConfig) -> Result<Arc<JenkinsClient>> {
    let client =
        JenkinsClient::new(&config.jenkins).context("Failed to initialize Jenkins client")?;
    Ok(Arc::new(client))
}

async fn resolve(args: &ResolveArgs, config_path: Option<&Path>, quiet: bool) -> Result<()> {
    let mut config = load_config(config_path, &args.server)?;
    apply_resolve_args(&mut config, args)?;
    config.validate()?;
    debug!("Effective configuration:\n{}", config);

    let rules = config.rule_set()?;
    let client = jenkins_client(&config)?;

    let mut progress = FanOutHandler::new().with(LoggingHandler);
    if !quiet {
        progress = progress.with(ConsoleHandler::stdout());
    }
    let coordinator = RunCoordinator::for_server(client, rules).with_progress(progress);

    let mut sinks: Vec<Box<dyn ReportSink>> = vec![
        Box::new(FileSink::new(config.output.clone())),
        Box::new(
            ConsoleSink::stdout().with_banner(format!("Results ({})", config.output.display())),
        ),
    ];

    let report = coordinator
        .run(&config.components, &mut sinks)
        .await
        .context("Failed to deliver the report")?;

    info!(
        components = report.len(),
        resolved = report.resolved_count(),
        output = %config.output.display(),
        "Resolution complete"
    );
    Ok(())
}

async fn locate(args: &LocateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, &args.server)?;
    config.validate_server()?;

    let locator = JobLocator::new(jenkins_client(&config)?);
    match locator.locate(&args.component).await {
        Some(job) => {
            println!("{}", job);
            Ok(())
        }
        None => Err(anyhow!("No Jenkins job found for '{}'", args.component)),
    }
}

fn list_rules(config_path: Option<&Path>) -> Result<()> {
    let config = ScoutConfig::load(config_path)?;
    let rules = config.rule_set()?;

    for rule in rules.rules() {
        println!("{}. {:<14} {}", rule.rank(), rule.name(), rule.pattern());
    }
    Ok(())
}
