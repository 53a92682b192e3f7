//! Pagecraft CLI
//!
//! Command-line interface for Pagecraft - manage the blocks of a page.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pagecraft_core::{BlockStore, BlockType, Config, ElementType, Layout, Position};

mod commands;
mod editor;
mod output;

use commands::block::BlockChanges;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "pagecraft")]
#[command(about = "Pagecraft - Build pages from blocks, stored locally")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage blocks
    Block {
        #[command(subcommand)]
        command: BlockCommands,
    },
    /// Manage the elements inside a block
    Element {
        #[command(subcommand)]
        command: ElementCommands,
    },
    /// Print or write the saved block JSON
    Export {
        /// Write to this file instead of stdout
        file: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Replace all blocks with a JSON file
    Import {
        /// JSON file holding an array of blocks
        file: PathBuf,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show storage location and counts
    Status,
}

/// Parse a number, rejecting NaN and infinities (JSON cannot store them)
fn parse_finite(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("invalid number '{}': {}", s, e))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{}' is not a finite number", s))
    }
}

#[derive(Args)]
struct LayoutArgs {
    /// Grid columns
    #[arg(long, default_value_t = 1.0, value_parser = parse_finite)]
    columns: f64,
    /// Grid rows
    #[arg(long, default_value_t = 1.0, value_parser = parse_finite)]
    rows: f64,
    /// Grid gap
    #[arg(long, default_value_t = 0.0, value_parser = parse_finite)]
    gap: f64,
}

#[derive(Subcommand)]
enum BlockCommands {
    /// Add a block at the end of the page
    #[command(alias = "create")]
    Add {
        /// Block ID (generated if omitted)
        #[arg(long)]
        id: Option<String>,
        /// Block type (banner, product_list, text)
        #[arg(short = 't', long = "type")]
        kind: BlockType,
        /// Block title
        #[arg(short = 'T', long, default_value = "")]
        title: String,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// List all blocks in display order
    #[command(alias = "ls")]
    List,
    /// Show block details (including elements)
    Show {
        /// Block ID
        id: String,
    },
    /// Change fields of a block
    Update {
        /// Block ID
        id: String,
        /// New block ID
        #[arg(long = "id", value_name = "NEW_ID")]
        new_id: Option<String>,
        /// New block type
        #[arg(short = 't', long = "type")]
        kind: Option<BlockType>,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New grid columns
        #[arg(long, value_parser = parse_finite)]
        columns: Option<f64>,
        /// New grid rows
        #[arg(long, value_parser = parse_finite)]
        rows: Option<f64>,
        /// New grid gap
        #[arg(long, value_parser = parse_finite)]
        gap: Option<f64>,
    },
    /// Edit a block as JSON in $EDITOR
    Edit {
        /// Block ID
        id: String,
    },
    /// Delete all blocks with an ID
    #[command(alias = "rm")]
    Delete {
        /// Block ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ElementCommands {
    /// Add an element to a block
    #[command(alias = "create")]
    Add {
        /// Block ID
        block_id: String,
        /// Element ID (generated if omitted)
        #[arg(long)]
        id: Option<String>,
        /// Element type (banner, product, text)
        #[arg(short = 't', long = "type")]
        kind: ElementType,
        #[arg(long, default_value_t = 0.0, value_parser = parse_finite)]
        x: f64,
        #[arg(long, default_value_t = 0.0, value_parser = parse_finite)]
        y: f64,
        #[arg(long, value_parser = parse_finite)]
        width: f64,
        #[arg(long, value_parser = parse_finite)]
        height: f64,
        /// Content payload (JSON, or plain text)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// List elements in a block
    #[command(alias = "ls")]
    List {
        /// Block ID
        block_id: String,
    },
    /// Remove an element from a block
    #[command(alias = "rm")]
    Remove {
        /// Block ID
        block_id: String,
        /// Element ID
        element_id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even if the config file is broken
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config, cli.verbose);
    debug!("Using data directory {:?}", config.data_dir);

    let mut store = BlockStore::open_with_config(&config).context("Failed to open block store")?;

    match cli.command {
        Commands::Block { command } => handle_block_command(command, &mut store, &output),
        Commands::Element { command } => handle_element_command(command, &mut store, &output),
        Commands::Export { file, pretty } => {
            commands::transfer::export(&store, file, pretty, &output)
        }
        Commands::Import { file } => commands::transfer::import(&mut store, file, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &config, &output),
    }
}

fn handle_block_command(
    command: BlockCommands,
    store: &mut commands::Store,
    output: &Output,
) -> Result<()> {
    match command {
        BlockCommands::Add {
            id,
            kind,
            title,
            layout,
        } => {
            let layout = Layout::new(layout.columns, layout.rows, layout.gap);
            commands::block::add(store, id, kind, title, layout, output)
        }
        BlockCommands::List => commands::block::list(store, output),
        BlockCommands::Show { id } => commands::block::show(store, id, output),
        BlockCommands::Update {
            id,
            new_id,
            kind,
            title,
            columns,
            rows,
            gap,
        } => {
            let changes = BlockChanges {
                id: new_id,
                kind,
                title,
                columns,
                rows,
                gap,
            };
            commands::block::update(store, id, changes, output)
        }
        BlockCommands::Edit { id } => commands::block::edit(store, id, output),
        BlockCommands::Delete { id } => commands::block::delete(store, id, output),
    }
}

fn handle_element_command(
    command: ElementCommands,
    store: &mut commands::Store,
    output: &Output,
) -> Result<()> {
    match command {
        ElementCommands::Add {
            block_id,
            id,
            kind,
            x,
            y,
            width,
            height,
            content,
        } => {
            let position = Position::new(x, y, width, height);
            commands::element::add(store, block_id, id, kind, position, content, output)
        }
        ElementCommands::List { block_id } => commands::element::list(store, block_id, output),
        ElementCommands::Remove {
            block_id,
            element_id,
        } => commands::element::remove(store, block_id, element_id, output),
    }
}

/// Initialize tracing
///
/// `RUST_LOG` wins over `-v`. Logs go to the configured file, or stderr.
fn init_logging(config: &Config, verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pagecraft_core={},pagecraft_cli={}",
            log_level, log_level
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    // Ignore error if already initialized
    match &config.log_file {
        Some(path) => match File::create(path) {
            Ok(file) => {
                let _ = builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(e) => {
                eprintln!("Warning: Could not create log file {:?}: {}", path, e);
                let _ = builder.with_writer(std::io::stderr).try_init();
            }
        },
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_block_add() {
        let cli = Cli::try_parse_from([
            "pagecraft", "block", "add", "--id", "b1", "--type", "product_list", "-T", "Shop",
            "--columns", "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Block {
                command:
                    BlockCommands::Add {
                        id,
                        kind,
                        title,
                        layout,
                    },
            } => {
                assert_eq!(id.as_deref(), Some("b1"));
                assert_eq!(kind, BlockType::ProductList);
                assert_eq!(title, "Shop");
                assert_eq!(layout.columns, 3.0);
                assert_eq!(layout.rows, 1.0);
            }
            _ => panic!("expected block add"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let result = Cli::try_parse_from(["pagecraft", "block", "add", "--type", "hero"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_non_finite_numbers() {
        for args in [
            &["pagecraft", "block", "add", "--type", "text", "--columns", "NaN"][..],
            &["pagecraft", "block", "update", "b1", "--gap", "inf"][..],
            &[
                "pagecraft", "element", "add", "b1", "--type", "text", "--width", "-inf",
                "--height", "1",
            ][..],
        ] {
            assert!(Cli::try_parse_from(args.iter().copied()).is_err(), "accepted {:?}", args);
        }

        assert_eq!(parse_finite("2.5"), Ok(2.5));
        assert!(parse_finite("abc").is_err());
    }

    #[test]
    fn test_parse_element_add() {
        let cli = Cli::try_parse_from([
            "pagecraft", "--json", "element", "add", "b1", "--type", "text", "--width", "200",
            "--height", "40", "--content", "Hello",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Element {
                command:
                    ElementCommands::Add {
                        block_id,
                        kind,
                        x,
                        width,
                        content,
                        ..
                    },
            } => {
                assert_eq!(block_id, "b1");
                assert_eq!(kind, ElementType::Text);
                assert_eq!(x, 0.0);
                assert_eq!(width, 200.0);
                assert_eq!(content.as_deref(), Some("Hello"));
            }
            _ => panic!("expected element add"),
        }
    }
}
