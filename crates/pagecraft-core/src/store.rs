//! Block store
//!
//! The `BlockStore` owns the ordered list of page blocks and mirrors it to a
//! key-value storage backend. The whole list is written as a single JSON
//! array under the `"blocks"` key.
//!
//! ## Mutation contract
//!
//! Every mutating operation is two steps: the in-memory list is changed
//! first, then `save_blocks()` writes the full list. If the write fails the
//! error is returned but the in-memory change stays; callers that need the
//! two to agree must reload or retry.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = BlockStore::open()?;  // Loads any saved blocks
//!
//! store.add_block(Block::new("hero", BlockType::Banner, "Welcome"))?;
//! store.delete_block("hero")?;
//! ```

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::Block;
use crate::storage::{FileStorage, KeyValueStorage, StorageError};

/// Storage key holding the serialized block list
pub const BLOCKS_KEY: &str = "blocks";

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize blocks: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Stored blocks are malformed: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Block '{block_id}' has a non-finite number at {field}")]
    NonFinite { block_id: String, field: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory block list persisted through a key-value storage backend
pub struct BlockStore<S> {
    /// Blocks in display order
    blocks: Vec<Block>,
    /// Persistence backend
    storage: S,
}

impl BlockStore<FileStorage> {
    /// Open the file-backed store from the default configuration
    pub fn open() -> anyhow::Result<Self> {
        use anyhow::Context;

        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(&config).context("Failed to open block store")
    }

    /// Open the file-backed store rooted at the configured data directory
    ///
    /// Loads previously saved blocks, if any.
    pub fn open_with_config(config: &Config) -> StoreResult<Self> {
        let mut store = Self::new(FileStorage::new(config.storage_dir()));
        store.load_blocks()?;
        info!(
            "Opened block store at {:?} with {} block(s)",
            store.storage.dir(),
            store.blocks.len()
        );
        Ok(store)
    }
}

impl<S: KeyValueStorage> BlockStore<S> {
    /// Create an empty store on top of `storage`
    ///
    /// Nothing is read until `load_blocks()` is called.
    pub fn new(storage: S) -> Self {
        Self {
            blocks: Vec::new(),
            storage,
        }
    }

    // ==================== Mutations ====================

    /// Append a block and persist
    ///
    /// Ids are not checked; a duplicate id yields two entries.
    pub fn add_block(&mut self, block: Block) -> StoreResult<()> {
        self.blocks.push(block);
        self.save_blocks()
    }

    /// Replace the first block whose id is `block_id`, keeping its position
    ///
    /// Does nothing (and writes nothing) if no block matches. The
    /// replacement's own id is not checked against `block_id`.
    pub fn update_block(&mut self, block_id: &str, updated: Block) -> StoreResult<()> {
        let Some(index) = self.blocks.iter().position(|b| b.id == block_id) else {
            return Ok(());
        };
        self.blocks[index] = updated;
        self.save_blocks()
    }

    /// Remove every block whose id is `block_id` and persist
    ///
    /// The write happens even when nothing matched.
    pub fn delete_block(&mut self, block_id: &str) -> StoreResult<()> {
        self.blocks.retain(|b| b.id != block_id);
        self.save_blocks()
    }

    /// Replace the whole block list and persist
    pub fn replace_blocks(&mut self, blocks: Vec<Block>) -> StoreResult<()> {
        self.blocks = blocks;
        self.save_blocks()
    }

    // ==================== Persistence ====================

    /// Write the whole block list to storage
    ///
    /// Nothing is written if any block holds a NaN or infinite number, since
    /// the stored list would no longer load.
    pub fn save_blocks(&mut self) -> StoreResult<()> {
        if let Some((block_id, field)) = self
            .blocks
            .iter()
            .find_map(|b| b.non_finite_field().map(|field| (b.id.clone(), field)))
        {
            return Err(StoreError::NonFinite { block_id, field });
        }

        let json = serde_json::to_string(&self.blocks).map_err(StoreError::Serialize)?;
        self.storage.set(BLOCKS_KEY, &json)?;
        debug!("Saved {} block(s), {} bytes", self.blocks.len(), json.len());
        Ok(())
    }

    /// Replace the block list with the stored one
    ///
    /// If nothing is stored (or the stored text is empty) the current list
    /// is kept as-is. A parse failure also leaves the list untouched.
    pub fn load_blocks(&mut self) -> StoreResult<()> {
        let Some(json) = self.storage.get(BLOCKS_KEY)? else {
            debug!("No saved blocks found");
            return Ok(());
        };
        if json.is_empty() {
            debug!("Saved blocks value is empty, keeping current list");
            return Ok(());
        }

        let blocks: Vec<Block> = serde_json::from_str(&json).map_err(StoreError::Deserialize)?;
        debug!("Loaded {} block(s), {} bytes", blocks.len(), json.len());
        self.blocks = blocks;
        Ok(())
    }

    // ==================== Queries ====================

    /// All blocks in display order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// First block with the given id
    pub fn get_block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // ==================== Advanced ====================

    /// Get access to the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning its storage backend
    pub fn into_storage(self) -> S {
        self.storage
    }
}
