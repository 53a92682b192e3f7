//! Command handlers

pub mod block;
pub mod config;
pub mod element;
pub mod status;
pub mod transfer;

use pagecraft_core::{BlockStore, FileStorage};

/// The store as used by the CLI: file-backed
pub type Store = BlockStore<FileStorage>;
