//! Library introspection command

use super::{build_fetcher, load_config, SourceArgs};
use anyhow::{Context, Result};
use trellis_loader::LibraryFetcher;
use trellis_schema::{ComponentRecord, PropSchema};

pub fn run(namespace: &str, sources: &SourceArgs) -> Result<()> {
    let config = load_config(sources)?;
    let fetcher = build_fetcher(&config)?;
    let bundle = fetcher
        .fetch(namespace)
        .with_context(|| format!("Failed to fetch library '{}'", namespace))?;

    println!("Library: {}", bundle.namespace);
    if let Some(version) = &bundle.version {
        println!("Version: {}", version);
    }
    if let Some(desc) = &bundle.description {
        println!("Description: {}", desc);
    }
    if let Some(fingerprint) = &bundle.fingerprint {
        println!("Fingerprint: {}", fingerprint.to_prefixed_hex());
    }

    let mut records: Vec<&ComponentRecord> = bundle.records.iter().collect();
    records.sort_by(|a, b| a.key.type_name.cmp(&b.key.type_name));

    for record in records {
        println!();
        println!("Component: {} <{}>", record.key, record.implementation.tag());
        if let Some(desc) = &record.description {
            println!("  # {}", desc);
        }

        match &record.contract {
            None => println!("  (no prop contract)"),
            Some(contract) if contract.props.is_empty() => println!("  (no props)"),
            Some(contract) => {
                for (name, schema) in &contract.props {
                    println!("  {}", format_prop(name, schema));
                    if let Some(desc) = &schema.description {
                        println!("    # {}", desc);
                    }
                }
            }
        }
    }

    Ok(())
}

fn format_prop(name: &str, schema: &PropSchema) -> String {
    let required = if schema.required { " (required)" } else { "" };
    let mut line = format!("{} : {}{}", name, schema.prop_type.describe(), required);
    if let Some(default) = &schema.default {
        let default = serde_json::to_string(default).unwrap_or_default();
        line.push_str(&format!(" = {}", default));
    }
    line
}
