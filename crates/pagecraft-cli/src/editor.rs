//! Block editing in $EDITOR, and delete confirmation
//!
//! A block is written as pretty JSON to a temp file named after it, the
//! user's editor is run on that file, and the result is parsed back.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};

use pagecraft_core::Block;

/// Edit a block as JSON
///
/// Returns `None` when the file was saved without changes.
pub fn edit_block(block: &Block) -> Result<Option<Block>> {
    let initial =
        serde_json::to_string_pretty(block).context("Failed to serialize block for editing")?;
    let (program, args) = find_editor()?;
    let temp_path = temp_path_for(&block.id);

    fs::write(&temp_path, &initial)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&program)
        .args(&args)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", program));

    let edited = match status {
        Ok(status) if status.success() => fs::read_to_string(&temp_path)
            .with_context(|| format!("Failed to read edited block: {:?}", temp_path)),
        Ok(_) => Err(anyhow::anyhow!(
            "Editor '{}' exited with non-zero status; block '{}' left unchanged",
            program,
            block.id
        )),
        Err(e) => Err(e),
    };
    let _ = fs::remove_file(&temp_path);

    parse_edited(&initial, &edited?)
}

/// Temp file for editing one block, e.g. `pagecraft_block_hero_4242.json`
fn temp_path_for(block_id: &str) -> PathBuf {
    let safe: String = block_id
        .chars()
        .take(40)
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    env::temp_dir().join(format!(
        "pagecraft_block_{}_{}.json",
        safe,
        std::process::id()
    ))
}

/// Parse the edited block JSON, `None` if nothing changed
fn parse_edited(initial: &str, edited: &str) -> Result<Option<Block>> {
    if edited.trim() == initial.trim() {
        return Ok(None);
    }
    if edited.trim().is_empty() {
        bail!("Edited block is empty; nothing saved");
    }
    let block = serde_json::from_str(edited).context("Edited block is not valid block JSON")?;
    Ok(Some(block))
}

/// The user's editor as program plus leading arguments
///
/// `$EDITOR` may carry flags (`code --wait`).
fn find_editor() -> Result<(String, Vec<String>)> {
    for var in ["EDITOR", "VISUAL"] {
        if let Some(command) = env::var(var).ok().as_deref().and_then(split_command) {
            return Ok(command);
        }
    }

    for editor in ["nano", "vim", "vi"] {
        if command_exists(editor) {
            return Ok((editor.to_string(), Vec::new()));
        }
    }

    bail!(
        "No editor found for block JSON. Set $EDITOR.\n\
         Example: export EDITOR=nano"
    )
}

fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Ask a yes/no question on the terminal
///
/// Without a TTY on stdin the answer is no.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::BlockType;

    #[test]
    fn test_temp_path_names_block() {
        let path = temp_path_for("hero/../x y");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert!(name.starts_with("pagecraft_block_hero____x_y_"));
        assert!(name.ends_with(".json"));
        assert_eq!(path.parent().unwrap(), env::temp_dir());
    }

    #[test]
    fn test_parse_edited_unchanged() {
        let block = Block::new("b1", BlockType::Text, "Hi");
        let initial = serde_json::to_string_pretty(&block).unwrap();

        assert!(parse_edited(&initial, &format!("{}\n", initial)).unwrap().is_none());
    }

    #[test]
    fn test_parse_edited_changed() {
        let block = Block::new("b1", BlockType::Text, "Hi");
        let initial = serde_json::to_string_pretty(&block).unwrap();
        let edited = initial.replace("\"Hi\"", "\"Bye\"");

        let parsed = parse_edited(&initial, &edited).unwrap().unwrap();
        assert_eq!(parsed.title, "Bye");
        assert_eq!(parsed.id, "b1");
    }

    #[test]
    fn test_parse_edited_rejects_bad_json() {
        let initial = serde_json::to_string_pretty(&Block::new("b1", BlockType::Text, "Hi")).unwrap();

        assert!(parse_edited(&initial, "").is_err());
        assert!(parse_edited(&initial, "{\"id\": \"b1\"}").is_err());
    }

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("code --wait"),
            Some(("code".to_string(), vec!["--wait".to_string()]))
        );
        assert_eq!(split_command("nano"), Some(("nano".to_string(), Vec::new())));
        assert_eq!(split_command("   "), None);
    }

    #[test]
    fn test_command_exists() {
        #[cfg(unix)]
        assert!(command_exists("ls"));

        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }
}
