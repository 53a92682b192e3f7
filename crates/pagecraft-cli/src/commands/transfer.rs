//! Export and import of the persisted block list

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use pagecraft_core::{Block, KeyValueStorage, BLOCKS_KEY};

use super::Store;
use crate::output::Output;

/// Write the persisted block JSON to a file, or stdout
pub fn export(store: &Store, file: Option<PathBuf>, pretty: bool, output: &Output) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(store.blocks()).context("Failed to serialize blocks")?
    } else {
        store
            .storage()
            .get(BLOCKS_KEY)
            .context("Failed to read saved blocks")?
            .unwrap_or_else(|| "[]".to_string())
    };

    match file {
        Some(path) => {
            fs::write(&path, &json).with_context(|| format!("Failed to write {:?}", path))?;
            output.success(&format!(
                "Exported {} block(s) to {}",
                store.len(),
                path.display()
            ));
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Replace all blocks with the contents of a JSON file
pub fn import(store: &mut Store, file: PathBuf, output: &Output) -> Result<()> {
    let text = fs::read_to_string(&file).with_context(|| format!("Failed to read {:?}", file))?;

    let blocks: Vec<Block> = serde_json::from_str(&text)
        .with_context(|| format!("{:?} is not a valid block list", file))?;
    store
        .replace_blocks(blocks)
        .context("Failed to save imported blocks")?;

    output.success(&format!("Imported {} block(s)", store.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use pagecraft_core::{BlockStore, BlockType, FileStorage};
    use tempfile::TempDir;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn store_with(dir: &TempDir, titles: &[&str]) -> Store {
        let mut store = BlockStore::new(FileStorage::new(dir.path().join("data")));
        for (i, title) in titles.iter().enumerate() {
            store
                .add_block(Block::new(format!("b{}", i), BlockType::Text, *title))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_export_writes_saved_json() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with(&temp_dir, &["One", "Two"]);
        let target = temp_dir.path().join("out.json");

        export(&store, Some(target.clone()), false, &quiet()).unwrap();

        let exported = fs::read_to_string(&target).unwrap();
        let saved = fs::read_to_string(temp_dir.path().join("data/blocks.json")).unwrap();
        assert_eq!(exported, saved);
    }

    #[test]
    fn test_export_without_saved_blocks() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with(&temp_dir, &[]);
        let target = temp_dir.path().join("out.json");

        export(&store, Some(target.clone()), false, &quiet()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
    }

    #[test]
    fn test_import_replaces_blocks() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store_with(&temp_dir, &["Old"]);
        let source = temp_dir.path().join("in.json");
        let incoming = vec![
            Block::new("x", BlockType::Banner, "Hero"),
            Block::new("y", BlockType::ProductList, "Shop"),
        ];
        fs::write(&source, serde_json::to_string(&incoming).unwrap()).unwrap();

        import(&mut store, source, &quiet()).unwrap();

        assert_eq!(store.blocks(), incoming.as_slice());
        let mut reopened = BlockStore::new(FileStorage::new(temp_dir.path().join("data")));
        reopened.load_blocks().unwrap();
        assert_eq!(reopened.blocks(), incoming.as_slice());
    }

    #[test]
    fn test_import_malformed_file_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store_with(&temp_dir, &["Keep"]);
        let saved_path = temp_dir.path().join("data/blocks.json");
        let saved = fs::read_to_string(&saved_path).unwrap();
        let source = temp_dir.path().join("in.json");
        fs::write(&source, r#"[{"id":"x","type":"hero"}]"#).unwrap();

        assert!(import(&mut store, source, &quiet()).is_err());

        assert_eq!(fs::read_to_string(&saved_path).unwrap(), saved);
        assert_eq!(store.len(), 1);
        assert_eq!(store.blocks()[0].title, "Keep");
    }

    #[test]
    fn test_import_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store_with(&temp_dir, &["Keep"]);

        let result = import(&mut store, temp_dir.path().join("absent.json"), &quiet());

        assert!(result.is_err());
        assert_eq!(store.len(), 1);
    }
}
