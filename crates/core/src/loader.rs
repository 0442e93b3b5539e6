//! URL contract shared with the frontend i18n runtime.
//!
//! The runtime's HTTP backend loads `{{lng}}/{{ns}}` bundles from the same
//! server `pull` reads from. Bundle URLs are always derived from the load
//! path template here so both sides agree on the shape.

use std::sync::OnceLock;
use url::Url;

/// Load path relative to the backend base.
pub const DEFAULT_LOAD_PATH: &str = "locales/{{lng}}/{{ns}}.json";

/// Manifest location relative to the backend base.
const MANIFEST_PATH: &[&str] = &["locales", "manifest.json"];

const LNG_PLACEHOLDER: &str = "{{lng}}";
const NS_PLACEHOLDER: &str = "{{ns}}";

static RUNTIME: OnceLock<LoaderOptions> = OnceLock::new();

/// Options the translation runtime is initialized with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub load_path: String,
    pub language: String,
    pub fallback_language: String,
    pub namespaces: Vec<String>,
    pub default_namespace: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            load_path: DEFAULT_LOAD_PATH.to_string(),
            language: "en".to_string(),
            fallback_language: "en".to_string(),
            namespaces: vec!["common".to_string()],
            default_namespace: "common".to_string(),
        }
    }
}

impl LoaderOptions {
    /// Resolve the URL of the `lng`/`ns` bundle under `base`.
    ///
    /// Each template segment has its placeholders substituted and is then
    /// pushed as one percent-encoded path segment, so a language or
    /// namespace can never introduce extra path components.
    pub fn bundle_url(&self, base: &Url, lng: &str, ns: &str) -> Url {
        let segments: Vec<String> = self
            .load_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                segment
                    .replace(LNG_PLACEHOLDER, lng)
                    .replace(NS_PLACEHOLDER, ns)
            })
            .collect();
        join_segments(base, segments.iter().map(String::as_str))
    }
}

/// URL of the manifest listing languages and namespaces.
pub fn manifest_url(base: &Url) -> Url {
    join_segments(base, MANIFEST_PATH.iter().copied())
}

fn join_segments<'a>(base: &Url, segments: impl Iterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    // Bases are validated by config::parse_backend_base; a cannot-be-a-base
    // URL is returned unchanged.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Install the runtime options once per process.
///
/// Returns `true` for the call that performed the initialization and
/// `false` for every later call (hot reload). Later options are ignored.
pub fn init_once(options: LoaderOptions) -> bool {
    let mut installed = false;
    RUNTIME.get_or_init(|| {
        installed = true;
        options
    });
    installed
}

/// Options installed by [`init_once`], if any.
pub fn current() -> Option<&'static LoaderOptions> {
    RUNTIME.get()
}
