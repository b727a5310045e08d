//! Library fetcher trait and local fetchers

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use trellis_core::{Result, TrellisError};
use trellis_schema::LibraryBundle;

/// File name suffix of library manifests: `<namespace>.lib.toml`
pub const MANIFEST_SUFFIX: &str = ".lib.toml";

/// Trait implemented by every source of library code (directory, HTTP,
/// in-memory).
///
/// `fetch` runs on a background thread and may block. It must return
/// `TrellisError::LibraryNotFound` when the source simply does not carry the
/// namespace, so that a [`FetcherChain`] can try the next source.
pub trait LibraryFetcher: Send + Sync {
    /// Fetcher name for logs (e.g. "directory", "http")
    fn name(&self) -> &str;

    /// Fetch and build the bundle for one namespace
    fn fetch(&self, namespace: &str) -> Result<LibraryBundle>;
}

/// Reject namespaces that could escape a directory or URL path
pub(crate) fn validate_namespace(namespace: &str) -> Result<()> {
    let valid = !namespace.is_empty()
        && !namespace.starts_with('.')
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(TrellisError::FetchError(format!(
            "Invalid namespace '{}'",
            namespace
        )))
    }
}

/// Loads `<root>/<namespace>.lib.toml`
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn manifest_path(&self, namespace: &str) -> PathBuf {
        self.root.join(format!("{}{}", namespace, MANIFEST_SUFFIX))
    }

    /// Namespaces with a manifest in this directory, sorted
    pub fn available(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if !self.root.exists() {
            return Ok(names);
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(name) = entry
                .file_name()
                .to_str()
                .and_then(|n| n.strip_suffix(MANIFEST_SUFFIX))
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl LibraryFetcher for DirectoryFetcher {
    fn name(&self) -> &str {
        "directory"
    }

    fn fetch(&self, namespace: &str) -> Result<LibraryBundle> {
        validate_namespace(namespace)?;
        let path = self.manifest_path(namespace);
        if !path.exists() {
            return Err(TrellisError::LibraryNotFound(namespace.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        let bundle = LibraryBundle::from_manifest_str(&content).map_err(|e| {
            TrellisError::ManifestError(format!("{}: {}", path.display(), e))
        })?;
        bundle.expect_namespace(namespace)
    }
}

enum StaticSource {
    Bundle(LibraryBundle),
    Manifest(String),
}

/// In-memory libraries, for hosts that compile their libraries in
#[derive(Default)]
pub struct StaticFetcher {
    sources: HashMap<String, StaticSource>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: serve a prebuilt bundle under its own namespace
    pub fn with_bundle(mut self, bundle: LibraryBundle) -> Self {
        self.sources
            .insert(bundle.namespace.clone(), StaticSource::Bundle(bundle));
        self
    }

    /// Builder: serve a manifest under the given namespace. The manifest is
    /// parsed on fetch, so parse errors surface as load failures.
    pub fn with_manifest(mut self, namespace: impl Into<String>, manifest: impl Into<String>) -> Self {
        self.sources
            .insert(namespace.into(), StaticSource::Manifest(manifest.into()));
        self
    }
}

impl LibraryFetcher for StaticFetcher {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, namespace: &str) -> Result<LibraryBundle> {
        match self.sources.get(namespace) {
            Some(StaticSource::Bundle(bundle)) => Ok(bundle.clone()),
            Some(StaticSource::Manifest(content)) => {
                LibraryBundle::from_manifest_str(content)?.expect_namespace(namespace)
            }
            None => Err(TrellisError::LibraryNotFound(namespace.to_string())),
        }
    }
}

/// Tries each fetcher in order. A source that does not carry the namespace
/// passes to the next one; any other error stops the search.
#[derive(Default)]
pub struct FetcherChain {
    fetchers: Vec<Box<dyn LibraryFetcher>>,
}

impl FetcherChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fetcher: impl LibraryFetcher + 'static) {
        self.fetchers.push(Box::new(fetcher));
    }

    /// Builder form of [`FetcherChain::push`]
    pub fn with(mut self, fetcher: impl LibraryFetcher + 'static) -> Self {
        self.push(fetcher);
        self
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}

impl LibraryFetcher for FetcherChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn fetch(&self, namespace: &str) -> Result<LibraryBundle> {
        for fetcher in &self.fetchers {
            match fetcher.fetch(namespace) {
                Err(e) if e.is_not_found() => {
                    tracing::trace!(namespace, fetcher = fetcher.name(), "library not in source");
                }
                other => return other,
            }
        }
        Err(TrellisError::LibraryNotFound(namespace.to_string()))
    }
}
