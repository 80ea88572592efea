//! shell - launches VMIL images and runs them to completion.

use std::num::NonZeroU8;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use os::{Config, Environment, Shell, StopReason};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "shell")]
#[command(author, version, about = "Run VMIL programs under the cooperative scheduler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the given images and run until they finish
    Run {
        /// Image files, launched in order
        #[arg(required = true)]
        files: Vec<String>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory program names are resolved against
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Steps granted to each program per pass
        #[arg(short, long)]
        priority: Option<NonZeroU8>,

        /// Stop after this many passes
        #[arg(long)]
        max_passes: Option<u64>,

        /// Trace every executed instruction and dump remaining tasks
        #[arg(short, long)]
        trace: bool,
    },
}

fn main() {
    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Returns whether every program launched and finished.
fn run(cli: Cli) -> Result<bool> {
    let Command::Run {
        files,
        config,
        root,
        priority,
        max_passes,
        trace,
    } = cli.command;

    let mut config = match config {
        Some(path) => Config::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(priority) = priority {
        config.default_priority = priority;
    }
    if let Some(max_passes) = max_passes {
        config.max_passes = max_passes;
    }
    if trace {
        config.trace = true;
        config.log_filter = "trace".to_string();
    }
    init_tracing(&config.log_filter);

    let env = Environment::new(config, root);
    let mut shell = Shell::new(&env);

    let summary = shell.launch_all(&files);
    for (name, id) in &summary.launched {
        println!("{} {} as task {}", "launched".green().bold(), name, id);
    }
    for err in &summary.failed {
        println!("{} {}", "failed".red().bold(), err);
    }
    if summary.launched.is_empty() {
        return Ok(false);
    }

    let report = shell.drive();
    let status = match report.reason {
        StopReason::Completed => "completed".green().bold(),
        StopReason::Wedged => "wedged".yellow().bold(),
        StopReason::PassLimit => "pass limit reached".yellow().bold(),
    };
    println!(
        "{} after {} passes, {} steps, {} finished, {} remaining",
        status,
        report.passes,
        report.steps,
        report.finished.len(),
        report.remaining.len()
    );

    if env.config.trace {
        for vm in shell.runtime().tasks() {
            print!("{}", vm.dump_stack());
        }
    }

    Ok(summary.failed.is_empty() && report.reason == StopReason::Completed)
}
