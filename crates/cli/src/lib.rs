//! Command-line front end for locale-sync.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod commands;
pub mod common;

/// Environment variable controlling log output.
const LOG_ENV: &str = "LOCALE_SYNC_LOG";

/// Crates whose logs a plain level applies to.
const LOG_TARGETS: &[&str] = &["locale_sync_core", "locale_sync_cli"];

#[derive(Parser, Debug)]
#[command(
    name = "locale-sync",
    version,
    about = "Pull translations from the i18n backend and fix the generated resources type"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 📥 Pull every language/namespace bundle listed in the backend manifest
    Pull(commands::pull::PullArgs),
    /// 🔧 Turn the generated default type export into a named export
    FixTypes(commands::fix_types::FixTypesArgs),
}

/// Parse `args`, run the selected command and return the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("[i18n] Failed: could not create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Pull(args)) => commands::pull::run(args).await,
            Some(Commands::FixTypes(args)) => commands::fix_types::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // LOCALE_SYNC_LOG takes a plain level ("debug") applied to our crates,
    // or a full filter spec like "locale_sync_core=trace,reqwest=debug".
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => level_filter(&level),
        Ok(spec) => spec,
        Err(_) => level_filter("warn"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn level_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
