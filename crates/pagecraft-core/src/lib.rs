//! Pagecraft Core Library
//!
//! This crate provides the state container behind a page builder: an
//! ordered list of page blocks (banners, product lists, text) kept in memory
//! and mirrored to a key-value text store.
//!
//! # Architecture
//!
//! - **BlockStore**: owns the block list; every mutation rewrites the full
//!   list under the `"blocks"` key
//! - **KeyValueStorage**: injected persistence (file-backed or in-memory)
//!
//! # Quick Start
//!
//! ```text
//! let mut store = BlockStore::open()?;
//!
//! // Add a block
//! let block = Block::new("hero", BlockType::Banner, "Summer sale");
//! store.add_block(block)?;
//!
//! // Read blocks back in display order
//! for block in store.blocks() { ... }
//! ```
//!
//! # Modules
//!
//! - `store`: The block store (main entry point)
//! - `models`: Blocks, elements, layout and position
//! - `storage`: Key-value storage backends
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::{Block, BlockType, Element, ElementType, Layout, Position, UnknownTag};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageResult};
pub use store::{BlockStore, StoreError, StoreResult, BLOCKS_KEY};
