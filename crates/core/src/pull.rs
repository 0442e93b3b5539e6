//! Manifest-driven pull of translation bundles into `<out>/<lng>/<ns>.json`.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::client::BackendClient;
use crate::error::SyncError;

/// Progress notifications emitted while pulling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullEvent {
    /// The manifest was fetched and validated.
    Manifest {
        url: String,
        languages: usize,
        namespaces: usize,
    },
    /// A bundle was written to this path.
    Wrote(PathBuf),
}

/// Outcome of a completed pull.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullReport {
    pub languages: Vec<String>,
    pub namespaces: Vec<String>,
    pub written: Vec<PathBuf>,
}

/// Destination of the `lng`/`ns` bundle under `out_dir`.
pub fn bundle_path(out_dir: &Path, lng: &str, ns: &str) -> PathBuf {
    out_dir.join(lng).join(format!("{ns}.json"))
}

/// Serialize a bundle the way it is stored on disk: two-space indent, trailing newline.
pub fn render_bundle(bundle: &Value) -> Result<String, serde_json::Error> {
    let mut rendered = serde_json::to_string_pretty(bundle)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Write one bundle, creating its language directory if needed.
pub async fn write_bundle(path: &Path, bundle: &Value) -> Result<(), SyncError> {
    let contents = render_bundle(bundle).map_err(|source| SyncError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| SyncError::FileSystem {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, contents)
        .await
        .map_err(|source| SyncError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
}

/// Pull every bundle named in the manifest.
///
/// Requests run one at a time, languages outer and namespaces inner. The
/// first failure aborts the run and files written before it are left in
/// place.
pub async fn pull_translations<F>(
    client: &BackendClient,
    out_dir: &Path,
    mut on_event: F,
) -> Result<PullReport, SyncError>
where
    F: FnMut(&PullEvent),
{
    let manifest_url = client.manifest_url();
    info!(url = %manifest_url, "Fetching manifest");
    let manifest = client.fetch_manifest().await?;
    on_event(&PullEvent::Manifest {
        url: manifest_url.to_string(),
        languages: manifest.languages.len(),
        namespaces: manifest.namespaces.len(),
    });

    debug!(
        languages = ?manifest.languages,
        namespaces = ?manifest.namespaces,
        pairs = manifest.pair_count(),
        "Manifest validated."
    );

    let mut written = Vec::with_capacity(manifest.pair_count());
    for (lng, ns) in manifest.pairs() {
        let bundle = client.fetch_bundle(lng, ns).await?;
        let path = bundle_path(out_dir, lng, ns);
        write_bundle(&path, &bundle).await?;
        debug!(lng, ns, path = %path.display(), "Bundle written.");
        on_event(&PullEvent::Wrote(path.clone()));
        written.push(path);
    }

    info!(files = written.len(), "Pull complete");
    Ok(PullReport {
        languages: manifest.languages,
        namespaces: manifest.namespaces,
        written,
    })
}
