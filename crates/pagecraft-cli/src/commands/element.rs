//! Element command handlers
//!
//! Elements live inside their block, so every change here is a
//! whole-block replacement through the store.

use anyhow::{Context, Result};
use serde_json::Value;
use uuid::Uuid;

use pagecraft_core::{Element, ElementType, Position};

use super::block::find_block;
use super::Store;
use crate::output::Output;

/// Add an element to the end of a block
pub fn add(
    store: &mut Store,
    block_id: String,
    element_id: Option<String>,
    kind: ElementType,
    position: Position,
    content: Option<String>,
    output: &Output,
) -> Result<()> {
    let content = content
        .as_deref()
        .map(parse_content)
        .unwrap_or(Value::Null);

    let mut block = find_block(store, &block_id)?.clone();
    let element_id = element_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    if block.get_element(&element_id).is_some() {
        output.warning(&format!(
            "Block '{}' already has an element with id '{}'",
            block_id, element_id
        ));
    }

    block.add_element(Element::new(element_id.clone(), kind, position).with_content(content));
    store
        .update_block(&block_id, block)
        .context("Failed to add element")?;

    output.success(&format!("Added element {} to block {}", element_id, block_id));
    Ok(())
}

/// List the elements of a block
pub fn list(store: &Store, block_id: String, output: &Output) -> Result<()> {
    let block = find_block(store, &block_id)?;
    output.print_elements(block);
    Ok(())
}

/// Remove every element with the given id from a block
pub fn remove(store: &mut Store, block_id: String, element_id: String, output: &Output) -> Result<()> {
    let mut block = find_block(store, &block_id)?.clone();

    let removed = block.remove_element(&element_id);
    if removed == 0 {
        anyhow::bail!("Element not found: {}", element_id);
    }

    store
        .update_block(&block_id, block)
        .context("Failed to remove element")?;

    output.success(&format!(
        "Removed {} element(s) {} from block {}",
        removed, element_id, block_id
    ));
    Ok(())
}

/// Parse `--content`: JSON if it parses, otherwise a plain string
fn parse_content(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
