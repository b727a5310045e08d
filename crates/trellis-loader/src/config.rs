//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `TRELLIS_LIBRARY_PATH`, `TRELLIS_LIBRARY_URL`,
//!    `TRELLIS_PROPS_CHECK`
//! 2. Project-local: `.trellis/config.toml`
//! 3. Global: `~/.trellis/config.toml`
//!
//! Library sources accumulate across layers; higher layers are searched
//! first.

use crate::fetch::{DirectoryFetcher, FetcherChain};
use crate::http::HttpFetcher;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trellis_core::{Result, TrellisError};

const ENV_LIBRARY_PATH: &str = "TRELLIS_LIBRARY_PATH";
const ENV_LIBRARY_URL: &str = "TRELLIS_LIBRARY_URL";
const ENV_PROPS_CHECK: &str = "TRELLIS_PROPS_CHECK";

/// Where library manifests are looked up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibrarySources {
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Render defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Check props of every node, regardless of the node's own flag
    #[serde(default)]
    pub props_check: bool,
}

/// HTTP fetcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Config file structure. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrellisConfig {
    #[serde(default)]
    pub libraries: LibrarySources,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

impl TrellisConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = TrellisConfig::default();

        // Layer 1: Global config (~/.trellis/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        // Layer 2: Project-local config (.trellis/config.toml)
        let local_path = PathBuf::from(".trellis/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        // Layer 3: Environment variable overrides
        Self::apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Load config from a specific file path only, plus env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Build the fetcher chain: directories first, then URLs, each in
    /// configured order.
    pub fn build_fetcher(&self) -> FetcherChain {
        let mut chain = FetcherChain::new();
        for path in &self.libraries.paths {
            chain.push(DirectoryFetcher::new(path));
        }
        for url in &self.libraries.urls {
            chain.push(HttpFetcher::with_settings(url.clone(), &self.http));
        }
        chain
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".trellis").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<TrellisConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: TrellisConfig = toml::from_str(&content).map_err(|e| {
            TrellisError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    /// Overlay sources are searched before the base's
    fn merge_into(base: &mut TrellisConfig, overlay: TrellisConfig) {
        prepend(&mut base.libraries.paths, overlay.libraries.paths);
        prepend(&mut base.libraries.urls, overlay.libraries.urls);

        if overlay.render.props_check {
            base.render.props_check = true;
        }
        if overlay.http.timeout_secs != default_timeout_secs() {
            base.http.timeout_secs = overlay.http.timeout_secs;
        }
        if overlay.http.max_retries != default_max_retries() {
            base.http.max_retries = overlay.http.max_retries;
        }
    }

    fn apply_env_overrides(config: &mut TrellisConfig) {
        if let Some(paths) = std::env::var_os(ENV_LIBRARY_PATH) {
            let paths: Vec<PathBuf> = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            prepend(&mut config.libraries.paths, paths);
        }
        if let Ok(url) = std::env::var(ENV_LIBRARY_URL) {
            if !url.is_empty() {
                prepend(&mut config.libraries.urls, vec![url]);
            }
        }
        if let Ok(flag) = std::env::var(ENV_PROPS_CHECK) {
            config.render.props_check = matches!(flag.as_str(), "1" | "true" | "yes" | "on");
        }
    }
}

fn prepend<T: PartialEq>(base: &mut Vec<T>, front: Vec<T>) {
    let mut merged: Vec<T> = front;
    for item in base.drain(..) {
        if !merged.contains(&item) {
            merged.push(item);
        }
    }
    *base = merged;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::LibraryFetcher;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("trellis_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_config_from_file() {
        // Env layer must not interfere
        std::env::remove_var(ENV_LIBRARY_PATH);
        std::env::remove_var(ENV_LIBRARY_URL);
        std::env::remove_var(ENV_PROPS_CHECK);

        let path = temp_config(
            r#"
[libraries]
paths = ["libs", "vendor/libs"]
urls = ["https://cdn.example.com/libs"]

[render]
props_check = true

[http]
timeout_secs = 5
"#,
        );
        let config = TrellisConfig::load_from_file(&path).unwrap();

        assert_eq!(
            config.libraries.paths,
            vec![PathBuf::from("libs"), PathBuf::from("vendor/libs")]
        );
        assert_eq!(config.libraries.urls.len(), 1);
        assert!(config.render.props_check);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.build_fetcher().len(), 3);

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_empty_config_defaults() {
        let path = temp_config("");
        let file = TrellisConfig::load_file(&path).unwrap();
        assert!(file.libraries.paths.is_empty());
        assert!(!file.render.props_check);
        assert_eq!(file.http.timeout_secs, 30);
        assert!(file.build_fetcher().fetch("anything").unwrap_err().is_not_found());

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_invalid_config() {
        let path = temp_config("[libraries]\npaths = 3\n");
        assert!(matches!(
            TrellisConfig::load_file(&path),
            Err(TrellisError::ConfigError(_))
        ));
        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_merge_precedence() {
        let mut base = TrellisConfig::default();
        base.libraries.paths = vec![PathBuf::from("global"), PathBuf::from("shared")];

        let mut overlay = TrellisConfig::default();
        overlay.libraries.paths = vec![PathBuf::from("project"), PathBuf::from("shared")];
        overlay.http.max_retries = 5;

        TrellisConfig::merge_into(&mut base, overlay);
        assert_eq!(
            base.libraries.paths,
            vec![
                PathBuf::from("project"),
                PathBuf::from("shared"),
                PathBuf::from("global")
            ]
        );
        assert_eq!(base.http.max_retries, 5);
        assert_eq!(base.http.timeout_secs, 30);
    }
}
