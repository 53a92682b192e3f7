//! Block command handlers

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use pagecraft_core::{Block, BlockType, Layout};

use super::Store;
use crate::editor::{confirm, edit_block};
use crate::output::Output;

/// Field changes requested by `block update`
#[derive(Debug, Default, Clone)]
pub struct BlockChanges {
    pub id: Option<String>,
    pub kind: Option<BlockType>,
    pub title: Option<String>,
    pub columns: Option<f64>,
    pub rows: Option<f64>,
    pub gap: Option<f64>,
}

impl BlockChanges {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.kind.is_none()
            && self.title.is_none()
            && self.columns.is_none()
            && self.rows.is_none()
            && self.gap.is_none()
    }

    /// Produce the replacement block
    pub fn apply(self, mut block: Block) -> Block {
        if let Some(id) = self.id {
            block.id = id;
        }
        if let Some(kind) = self.kind {
            block.kind = kind;
        }
        if let Some(title) = self.title {
            block.title = title;
        }
        if let Some(columns) = self.columns {
            block.layout.columns = columns;
        }
        if let Some(rows) = self.rows {
            block.layout.rows = rows;
        }
        if let Some(gap) = self.gap {
            block.layout.gap = gap;
        }
        block
    }
}

/// Create a new block at the end of the page
pub fn add(
    store: &mut Store,
    id: Option<String>,
    kind: BlockType,
    title: String,
    layout: Layout,
    output: &Output,
) -> Result<()> {
    let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

    if store.get_block(&id).is_some() {
        output.warning(&format!("A block with id '{}' already exists", id));
    }

    let block = Block::new(id, kind, title).with_layout(layout);
    store
        .add_block(block.clone())
        .context("Failed to add block")?;

    output.success(&format!("Added block: {}", block.id));
    output.print_block(&block);
    Ok(())
}

/// List all blocks in display order
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_blocks(store.blocks());
    Ok(())
}

/// Show a single block
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let block = find_block(store, &id)?;
    output.print_block(block);
    Ok(())
}

/// Replace a block with a modified copy
pub fn update(store: &mut Store, id: String, changes: BlockChanges, output: &Output) -> Result<()> {
    if changes.is_empty() {
        bail!("Nothing to update. Pass at least one of --id, --type, --title, --columns, --rows, --gap");
    }

    let updated = changes.apply(find_block(store, &id)?.clone());
    store
        .update_block(&id, updated.clone())
        .context("Failed to update block")?;

    output.success(&format!("Updated block: {}", updated.id));
    output.print_block(&updated);
    Ok(())
}

/// Edit a block as JSON in $EDITOR
pub fn edit(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let current = find_block(store, &id)?;
    let Some(updated) = edit_block(current).context("Failed to edit block")? else {
        output.success("No changes.");
        return Ok(());
    };

    store
        .update_block(&id, updated.clone())
        .context("Failed to update block")?;

    output.success(&format!("Updated block: {}", updated.id));
    Ok(())
}

/// Delete every block with the given id
pub fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let matches = store.blocks().iter().filter(|b| b.id == id).count();
    if matches == 0 {
        output.warning(&format!("No block with id '{}'", id));
    }

    if matches > 0 && output.should_prompt() {
        println!("Delete {} block(s) with id '{}'", matches, id);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_block(&id).context("Failed to delete block")?;

    output.success(&format!("Deleted {} block(s): {}", matches, id));
    Ok(())
}

/// Look up a block by exact id
pub(crate) fn find_block<'a>(store: &'a Store, id: &str) -> Result<&'a Block> {
    store
        .get_block(id)
        .ok_or_else(|| anyhow::anyhow!("Block not found: {}", id))
}
