//! Tree check command

use super::render::{print_diagnostics_text, print_json, render_tree, RenderArgs};
use anyhow::Result;

pub fn run(args: RenderArgs) -> Result<()> {
    let outcome = render_tree(&args)?;

    if args.format == "json" {
        print_json(&outcome)?;
    } else if outcome.pass.is_clean() && outcome.unsettled.is_empty() {
        println!("All components resolved, no diagnostics.");
    } else {
        print_diagnostics_text(&outcome);
    }

    if !outcome.pass.is_clean() || !outcome.unsettled.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
