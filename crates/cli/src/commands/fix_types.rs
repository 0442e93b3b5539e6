use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use locale_sync_core::{ConfigOverrides, TypesConfig, normalize_file};

use super::{PREFIX, report};

#[derive(Args, Debug, Clone)]
pub struct FixTypesArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Generated resources type file. Defaults to src/@types/resources.ts"
    )]
    pub file: Option<PathBuf>,
    #[arg(
        long = "type-name",
        value_name = "NAME",
        help = "Name of the generated shape. Defaults to Resources"
    )]
    pub type_name: Option<String>,
    #[arg(
        long = "project-root",
        value_name = "DIR",
        help = "Frontend project root. Defaults to current working directory"
    )]
    pub project_root: Option<PathBuf>,
}

pub fn run(args: FixTypesArgs) -> i32 {
    report(run_inner(args))
}

fn run_inner(args: FixTypesArgs) -> Result<(), String> {
    let config = TypesConfig::load(ConfigOverrides {
        project_root: args.project_root,
        types_file: args.file,
        type_name: args.type_name,
        ..ConfigOverrides::default()
    })
    .map_err(|err| err.to_string())?;

    let normalized =
        normalize_file(&config.types_file, &config.type_name).map_err(|err| err.to_string())?;
    debug!(changed = normalized.changed(), "fix-types finished.");

    println!("{PREFIX} Fixed generated resources type to named export");
    Ok(())
}
