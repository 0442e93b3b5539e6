//! Manifest of languages and namespaces served by the backend.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::error::SyncError;

/// Validated manifest. Both lists are non-empty, duplicate-free, and hold
/// only entries usable as a single path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub languages: Vec<String>,
    pub namespaces: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    namespaces: Vec<String>,
}

impl Manifest {
    /// Validate a manifest document as returned by the backend.
    pub fn from_value(value: &Value) -> Result<Self, SyncError> {
        let shape_error = || SyncError::ManifestShape {
            manifest: value.to_string(),
        };

        let raw = RawManifest::deserialize(value).map_err(|_| shape_error())?;
        let languages = dedup(raw.languages);
        let namespaces = dedup(raw.namespaces);

        if languages.is_empty() || namespaces.is_empty() {
            return Err(shape_error());
        }
        if let Some(entry) = languages
            .iter()
            .chain(&namespaces)
            .find(|entry| !is_path_component(entry))
        {
            return Err(SyncError::ManifestEntry {
                entry: entry.clone(),
            });
        }

        Ok(Self {
            languages,
            namespaces,
        })
    }

    /// Every (language, namespace) pair, languages outer, in manifest order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.languages.iter().flat_map(move |lng| {
            self.namespaces
                .iter()
                .map(move |ns| (lng.as_str(), ns.as_str()))
        })
    }

    pub fn pair_count(&self) -> usize {
        self.languages.len() * self.namespaces.len()
    }
}

fn dedup(entries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

fn is_path_component(entry: &str) -> bool {
    !entry.is_empty() && entry != "." && entry != ".." && !entry.contains(['/', '\\'])
}
