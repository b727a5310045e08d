//! Tree render command

use super::{build_fetcher, load_config, SourceArgs};
use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use trellis_core::ElementNode;
use trellis_loader::{LoadState, LoaderCoordinator};
use trellis_render::{RenderPass, Renderer};

pub struct RenderArgs {
    pub tree: PathBuf,
    pub sources: SourceArgs,
    pub props_check: bool,
    pub timeout_ms: u64,
    pub format: String,
}

/// A finished render plus the namespaces that were still loading when the
/// timeout passed
pub struct RenderOutcome {
    pub pass: RenderPass,
    pub unsettled: Vec<String>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let outcome = render_tree(&args)?;

    if args.format == "json" {
        print_json(&outcome)?;
    } else {
        println!("{}", outcome.pass.output.outline());
        print_diagnostics_text(&outcome);
    }

    Ok(())
}

pub fn render_tree(args: &RenderArgs) -> Result<RenderOutcome> {
    let tree = ElementNode::from_json_file(&args.tree)
        .with_context(|| format!("Failed to load tree from {}", args.tree.display()))?;

    let config = load_config(&args.sources)?;
    let fetcher = build_fetcher(&config)?;
    let coordinator = LoaderCoordinator::new(fetcher);

    let mut renderer = Renderer::new(coordinator.clone())
        .with_props_check(args.props_check || config.render.props_check);
    let pass = renderer.render_until_settled(&tree, Duration::from_millis(args.timeout_ms));

    let unsettled = coordinator
        .states()
        .into_iter()
        .filter(|(_, state)| *state == LoadState::Loading)
        .map(|(namespace, _)| namespace)
        .collect();

    Ok(RenderOutcome { pass, unsettled })
}

pub fn print_json(outcome: &RenderOutcome) -> Result<()> {
    let output = json!({
        "output": outcome.pass.output.to_json(),
        "diagnostics": outcome.pass.diagnostics,
        "unsettled": outcome.unsettled,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_diagnostics_text(outcome: &RenderOutcome) {
    for namespace in &outcome.unsettled {
        println!("Still loading: {}", namespace);
    }

    if outcome.pass.diagnostics.is_empty() {
        return;
    }

    println!();
    println!("Diagnostics ({}):", outcome.pass.diagnostics.len());
    for diagnostic in &outcome.pass.diagnostics {
        println!("  {}", diagnostic);
    }
}
