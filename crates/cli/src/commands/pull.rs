use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;

use locale_sync_core::{BackendClient, ConfigOverrides, PullEvent, SyncConfig, pull_translations};

use super::{PREFIX, run_cli_async};
use crate::common::{format_elapsed_ms, format_relative_path};

#[derive(Args, Debug, Clone)]
pub struct PullArgs {
    #[arg(
        long = "backend-base",
        value_name = "URL",
        help = "Base URL of the translation backend. Overrides I18N_BACKEND_BASE"
    )]
    pub backend_base: Option<String>,
    #[arg(
        long = "project-root",
        value_name = "DIR",
        help = "Frontend project root. Defaults to current working directory"
    )]
    pub project_root: Option<PathBuf>,
}

pub async fn run(args: PullArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: PullArgs) -> Result<(), String> {
    let start_time = Instant::now();

    let config = SyncConfig::load(ConfigOverrides {
        backend_base: args.backend_base,
        project_root: args.project_root,
        ..ConfigOverrides::default()
    })
    .map_err(|err| err.to_string())?;

    let client = BackendClient::new(config.backend_base.clone()).map_err(|err| err.to_string())?;

    println!("{PREFIX} Fetching manifest: {}", client.manifest_url());
    let report = pull_translations(&client, &config.out_dir, |event| match event {
        PullEvent::Manifest {
            languages,
            namespaces,
            ..
        } => {
            println!("{PREFIX} Manifest lists {languages} language(s) x {namespaces} namespace(s)");
        }
        PullEvent::Wrote(path) => println!("{}", wrote_line(path, &config.project_root)),
    })
    .await
    .map_err(|err| err.to_string())?;

    println!(
        "\n{PREFIX} Done. Pulled {} file(s) in {}. You can now regenerate the resources type and run `locale-sync fix-types`",
        report.written.len(),
        format_elapsed_ms(start_time)
    );
    Ok(())
}

fn wrote_line(path: &Path, project_root: &Path) -> String {
    format!("{PREFIX} Wrote {}", format_relative_path(path, project_root))
}
