mod cli;
mod github;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use prenv_cloud_vultr::VultrClient;
use prenv_core::{
    Action, ConfigError, ExitClass, Orchestrator, Outcome, Outputs, PasswordPolicy, ProvisionError,
    WorkflowConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the outputs when GITHUB_OUTPUT is unset
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let code = run(&cli).await;
    std::process::exit(code);
}

async fn run(cli: &Cli) -> i32 {
    let (action, config, client) = match prepare(cli) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("{} {}", "✗ usage error:".red().bold(), e);
            publish_failure(&e);
            return ExitClass::Usage.code();
        }
    };

    tracing::info!(
        %action,
        environment = %config.environment,
        region = %config.region,
        plan = %config.plan,
        "starting"
    );

    let result = Orchestrator::new(&client, &config).run(action).await;
    let class = ExitClass::of(&result);

    match &result {
        Ok(outcome) => {
            print_summary(outcome, &config);
            if let Err(e) = publish_outputs(outcome, cli.password_policy()) {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                return ExitClass::Failed.code();
            }
        }
        Err(e) => {
            print_failure(e);
            publish_failure(e);
        }
    }

    class.code()
}

/// Everything that can be rejected before talking to the API
fn prepare(cli: &Cli) -> Result<(Action, WorkflowConfig, VultrClient), ConfigError> {
    let action = cli.action()?;
    let config = cli.workflow_config()?;
    let client = VultrClient::new(cli.vultr_config()?)
        .map_err(|_| ConfigError::Missing("VULTR_API_KEY"))?;
    Ok((action, config, client))
}

fn publish_outputs(outcome: &Outcome, password: PasswordPolicy) -> anyhow::Result<()> {
    let outputs = Outputs::from_outcome(outcome, password)?;
    github::publish(&outputs)
}

/// Best-effort: the run has already failed
fn publish_failure(error: &impl std::fmt::Display) {
    if let Err(e) = github::publish(&Outputs::failed(error)) {
        tracing::warn!(error = %format!("{:#}", e), "could not write outputs");
    }
}

fn print_summary(outcome: &Outcome, config: &WorkflowConfig) {
    match outcome {
        Outcome::Created(report) => {
            eprintln!(
                "{} {} → {} ({:.1}s)",
                "✓ created".green().bold(),
                config.environment.hostname().cyan(),
                report.ip_address,
                report.elapsed.as_secs_f64()
            );
            for record in &report.dns_records {
                eprintln!("  {} {} {}", record.record_type, record.name, record.data.dimmed());
            }
        }
        Outcome::Destroyed(report) => {
            if report.is_clean() {
                eprintln!(
                    "{} {} ({}, {})",
                    "✓ destroyed".green().bold(),
                    config.environment.hostname().cyan(),
                    report.records,
                    report.vms
                );
            } else {
                eprintln!(
                    "{} {} with failures (records: {}, instances: {})",
                    "⚠ destroyed".yellow().bold(),
                    config.environment.hostname().cyan(),
                    report.records,
                    report.vms
                );
                for item in report.records.failed.iter().chain(&report.vms.failed) {
                    eprintln!(
                        "  {} {}: {}",
                        "✗".red(),
                        item.target,
                        item.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }
        Outcome::NoOp { action, presence } => {
            eprintln!(
                "{} nothing to {}: {} is {}",
                "•".yellow(),
                action,
                config.environment.hostname().cyan(),
                presence
            );
        }
    }
}

fn print_failure(error: &ProvisionError) {
    // the message already embeds the API cause
    eprintln!("{} {}", "✗ failed:".red().bold(), error);
}
