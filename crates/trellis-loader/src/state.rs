//! Per-namespace load state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one namespace's library.
///
/// `NotRequested -> Loading -> Loaded | Failed`. `Loaded` and `Failed` are
/// terminal; only an explicit reload moves a namespace back to `Loading`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    NotRequested,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed(_))
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::NotRequested => write!(f, "not requested"),
            LoadState::Loading => write!(f, "loading"),
            LoadState::Loaded => write!(f, "loaded"),
            LoadState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
