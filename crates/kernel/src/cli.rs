//! Offline commands: render or validate a document file without a server.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use agora_sdk::document::Document;

use crate::content::{BlockTypeRegistry, nodes_to_html, render_value};

/// Read a JSON file. Invalid JSON is an error; a valid value of any shape is
/// accepted.
fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Render a document file as HTML, or as the node list with `as_json`.
pub fn cmd_render(path: &Path, as_json: bool, out: &mut impl Write) -> Result<()> {
    let value = read_json(path)?;
    let nodes = render_value(Some(&value));

    if as_json {
        serde_json::to_writer_pretty(&mut *out, &nodes).context("failed to write nodes")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", nodes_to_html(&nodes))?;
    }
    Ok(())
}

/// Validate a document file, printing one line per issue.
///
/// Fails when the file is not a document or any issue is found.
pub fn cmd_validate(path: &Path, out: &mut impl Write) -> Result<()> {
    let value = read_json(path)?;
    let Some(document) = Document::from_value(&value) else {
        bail!("{} has no blocks array", path.display());
    };

    let issues = BlockTypeRegistry::with_standard_types().validate_document(&document);
    if issues.is_empty() {
        writeln!(out, "{} blocks, no issues", document.len())?;
        return Ok(());
    }

    writeln!(out, "{:<6} {:<12} MESSAGE", "BLOCK", "TYPE")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for issue in &issues {
        writeln!(
            out,
            "{:<6} {:<12} {}",
            issue.index, issue.block_type, issue.message
        )?;
    }
    bail!("{} issue(s) found", issues.len())
}
