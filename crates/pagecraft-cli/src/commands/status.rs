//! Status command handler

use anyhow::Result;

use pagecraft_core::{Config, BLOCKS_KEY};

use super::Store;
use crate::output::{Output, OutputFormat};

/// Show where blocks are stored and what the page contains
pub fn show(store: &Store, config: &Config, output: &Output) -> Result<()> {
    let size = store.storage().size_of(BLOCKS_KEY)?;
    let elements: usize = store.blocks().iter().map(|b| b.elements.len()).sum();
    let path = store.storage().path_for(BLOCKS_KEY)?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "storage": {
                        "path": path,
                        "exists": size.is_some(),
                        "size": size.unwrap_or(0)
                    },
                    "counts": {
                        "blocks": store.len(),
                        "elements": elements
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Pagecraft Status");
            println!("================");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            match size {
                Some(bytes) => println!("  File:     {} ({} bytes)", path.display(), bytes),
                None => println!("  File:     {} (not written yet)", path.display()),
            }
            println!();
            println!("Contents:");
            println!("  Blocks:   {}", store.len());
            println!("  Elements: {}", elements);
        }
    }

    Ok(())
}
