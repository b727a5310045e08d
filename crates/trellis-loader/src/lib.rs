//! Trellis Loader - On-demand library loading
//!
//! This crate provides the loader coordinator, which tracks per-namespace
//! load state, deduplicates load requests and commits fetched libraries
//! into the component registry. Libraries come from pluggable fetchers
//! (directories, HTTP, in-memory) configured through layered config files.

mod config;
mod coordinator;
mod fetch;
mod http;
mod state;

pub use config::{HttpSettings, LibrarySources, RenderSettings, TrellisConfig};
pub use coordinator::{LoadEvent, LoaderCoordinator};
pub use fetch::{DirectoryFetcher, FetcherChain, LibraryFetcher, StaticFetcher, MANIFEST_SUFFIX};
pub use http::HttpFetcher;
pub use state::LoadState;
