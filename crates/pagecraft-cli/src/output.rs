//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use pagecraft_core::{Block, Element};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single block with its elements
    pub fn print_block(&self, block: &Block) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", block.id);
                println!("Type:     {}", block.kind);
                println!("Title:    {}", block.title);
                println!(
                    "Layout:   {} col x {} row, gap {}",
                    block.layout.columns, block.layout.rows, block.layout.gap
                );

                if !block.elements.is_empty() {
                    println!();
                    println!("── Elements ({}) ──", block.elements.len());
                    for element in &block.elements {
                        println!("{}", element_line(element));
                    }
                }
            }
            OutputFormat::Json => print_json(block),
            OutputFormat::Quiet => {
                println!("{}", block.id);
            }
        }
    }

    /// Print a list of blocks in display order
    pub fn print_blocks(&self, blocks: &[Block]) {
        match self.format {
            OutputFormat::Human => {
                if blocks.is_empty() {
                    println!("No blocks found.");
                    return;
                }
                for (index, block) in blocks.iter().enumerate() {
                    println!(
                        "{:>3}. {} | {:<12} | {} [{}]",
                        index + 1,
                        truncate(&block.id, 12),
                        block.kind,
                        truncate(&block.title, 40),
                        block.elements.len()
                    );
                }
                println!("\n{} block(s)", blocks.len());
            }
            OutputFormat::Json => print_json(&blocks),
            OutputFormat::Quiet => {
                for block in blocks {
                    println!("{}", block.id);
                }
            }
        }
    }

    /// Print the elements of a block
    pub fn print_elements(&self, block: &Block) {
        match self.format {
            OutputFormat::Human => {
                println!("Elements of: {} - {}", block.id, block.title);
                println!();

                if block.elements.is_empty() {
                    println!("No elements in this block.");
                    return;
                }
                for element in &block.elements {
                    println!("{}", element_line(element));
                }
                println!("\n{} element(s)", block.elements.len());
            }
            OutputFormat::Json => print_json(&block.elements),
            OutputFormat::Quiet => {
                for element in &block.elements {
                    println!("{}", element.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning (stderr in human mode)
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("⚠ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to format JSON output: {}", e),
    }
}

/// One-line summary of an element
fn element_line(element: &Element) -> String {
    let p = &element.position;
    let content = if element.content.is_null() {
        String::new()
    } else {
        format!(" {}", truncate(&element.content.to_string(), 40))
    };
    format!(
        "  {} ({}) at {},{} size {}x{}{}",
        element.id, element.kind, p.x, p.y, p.width, p.height, content
    )
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::{ElementType, Position};
    use serde_json::json;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("ünïcödé text", 6), "ünï...");
    }

    #[test]
    fn test_element_line() {
        let element = Element::new("e1", ElementType::Text, Position::new(1.0, 2.0, 30.0, 4.5));
        assert_eq!(element_line(&element), "  e1 (text) at 1,2 size 30x4.5");

        let element = element.with_content(json!("Hello"));
        assert_eq!(
            element_line(&element),
            "  e1 (text) at 1,2 size 30x4.5 \"Hello\""
        );
    }
}
