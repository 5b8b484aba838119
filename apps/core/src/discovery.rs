use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::model::{LaunchItem, Transliterator};

const APP_BUNDLE_EXTENSION: &str = "app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}

/// A launchable thing found on disk, before search keys are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredApp {
    pub id: String,
    pub name: String,
}

impl DiscoveredApp {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

pub trait DiscoveryProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;
    fn discover(&self) -> Result<Vec<DiscoveredApp>, ProviderError>;
}

/// One step of the display-name chain, e.g. a localized bundle name lookup
/// supplied by the platform shell. `None` defers to the next step.
pub trait DisplayNameResolver: Send + Sync {
    fn resolve(&self, bundle_path: &Path) -> Option<String>;
}

/// Tries each resolver in order, then the bundle stem, then the raw file name.
pub fn display_name_for(bundle_path: &Path, resolvers: &[Box<dyn DisplayNameResolver>]) -> String {
    resolvers
        .iter()
        .filter_map(|resolver| resolver.resolve(bundle_path))
        .find(|name| !name.trim().is_empty())
        .or_else(|| {
            bundle_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .filter(|stem| !stem.trim().is_empty())
        })
        .unwrap_or_else(|| {
            bundle_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| bundle_path.to_string_lossy().into_owned())
        })
}

/// Lists `*.app` bundles that are direct children of each root. Unreadable
/// roots are skipped, so a scan only ever yields fewer items.
pub struct AppBundleProvider {
    roots: Vec<PathBuf>,
    resolvers: Vec<Box<dyn DisplayNameResolver>>,
}

impl AppBundleProvider {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            resolvers: Vec::new(),
        }
    }

    pub fn with_resolvers(mut self, resolvers: Vec<Box<dyn DisplayNameResolver>>) -> Self {
        self.resolvers = resolvers;
        self
    }

    fn scan_root(&self, root: &Path) -> Vec<DiscoveredApp> {
        if !root.is_dir() {
            crate::logging::warn(&format!("[discovery] skipping missing root {}", root.display()));
            return Vec::new();
        }

        let apps: Vec<DiscoveredApp> = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry.file_name()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| is_app_bundle(entry.path()))
            .map(|entry| {
                let path = entry.path();
                DiscoveredApp {
                    id: path.to_string_lossy().into_owned(),
                    name: display_name_for(path, &self.resolvers),
                }
            })
            .collect();
        crate::logging::debug(&format!(
            "[discovery] root {} apps={}",
            root.display(),
            apps.len()
        ));
        apps
    }
}

impl DiscoveryProvider for AppBundleProvider {
    fn provider_name(&self) -> &'static str {
        "app-bundles"
    }

    fn discover(&self) -> Result<Vec<DiscoveredApp>, ProviderError> {
        Ok(self
            .roots
            .iter()
            .flat_map(|root| self.scan_root(root))
            .collect())
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_app_bundle(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(APP_BUNDLE_EXTENSION))
        .unwrap_or(false)
}

pub struct FixtureProvider {
    apps: Vec<DiscoveredApp>,
}

impl FixtureProvider {
    pub fn from_apps(apps: Vec<DiscoveredApp>) -> Self {
        Self { apps }
    }

    pub fn deterministic_fixture() -> Self {
        Self {
            apps: vec![
                DiscoveredApp::new("/Applications/Safari.app", "Safari"),
                DiscoveredApp::new("/System/Applications/Calculator.app", "Calculator"),
            ],
        }
    }
}

impl DiscoveryProvider for FixtureProvider {
    fn provider_name(&self) -> &'static str {
        "fixture"
    }

    fn discover(&self) -> Result<Vec<DiscoveredApp>, ProviderError> {
        Ok(self.apps.clone())
    }
}

/// Runs every provider and builds one sorted catalog. A failing provider is
/// logged and contributes nothing.
pub fn build_catalog(
    providers: &[Box<dyn DiscoveryProvider>],
    transliterator: &dyn Transliterator,
) -> Catalog {
    let mut items = Vec::new();
    for provider in providers {
        match provider.discover() {
            Ok(apps) => items.extend(
                apps.into_iter()
                    .map(|app| LaunchItem::with_transliterator(&app.id, &app.name, transliterator)),
            ),
            Err(error) => crate::logging::warn(&format!(
                "[discovery] provider {} failed: {error}",
                provider.provider_name()
            )),
        }
    }
    Catalog::new(items)
}
