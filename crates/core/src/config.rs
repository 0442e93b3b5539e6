//! Configuration for `pull` and `fix-types`.
//!
//! Values are layered, highest precedence first:
//! 1. command-line overrides
//! 2. `I18N_BACKEND_BASE` (backend base only)
//! 3. `locale-sync.toml` in the project root
//! 4. built-in defaults

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use crate::error::ConfigError;
use crate::normalize::DEFAULT_TYPE_NAME;

/// Local development backend used when nothing else is configured.
pub const DEFAULT_BACKEND_BASE: &str = "http://localhost:8080";

/// Environment variable overriding the backend base.
pub const BACKEND_BASE_ENV: &str = "I18N_BACKEND_BASE";

/// Optional project-level config file.
pub const CONFIG_FILENAME: &str = "locale-sync.toml";

const DEFAULT_OUT_DIR: &str = "src/locales";
const DEFAULT_TYPES_FILE: &str = "src/@types/resources.ts";

/// Contents of `locale-sync.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub pull: PullSection,
    pub types: TypesSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PullSection {
    pub backend_base: Option<String>,
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TypesSection {
    pub file: Option<PathBuf>,
    pub type_name: Option<String>,
}

impl ConfigFile {
    /// Read `locale-sync.toml` from `project_root`. A missing file yields the defaults.
    pub fn read(project_root: &Path) -> Result<Self, ConfigError> {
        let path = project_root.join(CONFIG_FILENAME);
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults.");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend_base: Option<String>,
    pub project_root: Option<PathBuf>,
    pub types_file: Option<PathBuf>,
    pub type_name: Option<String>,
}

/// Configuration of `pull`, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub backend_base: Url,
    pub project_root: PathBuf,
    pub out_dir: PathBuf,
}

impl SyncConfig {
    /// Resolve configuration from overrides, the process environment and the config file.
    pub fn load(mut overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let project_root = project_root_or_cwd(overrides.project_root.take());
        let file = ConfigFile::read(&project_root)?;
        let env_base = std::env::var(BACKEND_BASE_ENV).ok();

        Self::resolve(
            ConfigOverrides {
                project_root: Some(project_root),
                ..overrides
            },
            env_base,
            file,
        )
    }

    /// Layer the sources without touching the environment or the filesystem.
    pub fn resolve(
        overrides: ConfigOverrides,
        env_base: Option<String>,
        file: ConfigFile,
    ) -> Result<Self, ConfigError> {
        let project_root = overrides
            .project_root
            .unwrap_or_else(|| PathBuf::from("."));

        // An empty variable counts as unset.
        let base = overrides
            .backend_base
            .or_else(|| env_base.filter(|value| !value.trim().is_empty()))
            .or(file.pull.backend_base)
            .unwrap_or_else(|| DEFAULT_BACKEND_BASE.to_string());
        let backend_base = parse_backend_base(&base)?;

        let out_dir = project_root.join(
            file.pull
                .out_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
        );

        debug!(
            backend_base = %backend_base,
            out_dir = %out_dir.display(),
            "Resolved pull configuration."
        );

        Ok(Self {
            backend_base,
            project_root,
            out_dir,
        })
    }
}

/// Configuration of `fix-types`. The backend settings are never read here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypesConfig {
    pub project_root: PathBuf,
    pub types_file: PathBuf,
    pub type_name: String,
}

impl TypesConfig {
    pub fn load(mut overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let project_root = project_root_or_cwd(overrides.project_root.take());
        let file = ConfigFile::read(&project_root)?;

        Ok(Self::resolve(
            ConfigOverrides {
                project_root: Some(project_root),
                ..overrides
            },
            file.types,
        ))
    }

    pub fn resolve(overrides: ConfigOverrides, section: TypesSection) -> Self {
        let project_root = overrides
            .project_root
            .unwrap_or_else(|| PathBuf::from("."));
        let types_file = project_root.join(
            overrides
                .types_file
                .or(section.file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TYPES_FILE)),
        );
        let type_name = overrides
            .type_name
            .or(section.type_name)
            .unwrap_or_else(|| DEFAULT_TYPE_NAME.to_string());

        debug!(
            types_file = %types_file.display(),
            type_name = %type_name,
            "Resolved types configuration."
        );

        Self {
            project_root,
            types_file,
            type_name,
        }
    }
}

fn project_root_or_cwd(project_root: Option<PathBuf>) -> PathBuf {
    project_root.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Parse and check a backend base URL.
pub fn parse_backend_base(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBackendBase {
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}
