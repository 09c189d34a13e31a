//! tagfix - interactive batch editor for audio file tags.
//!
//! Point it at a directory of FLAC, MP3, M4A, OGG, Opus, WMA or WAV files,
//! pick the fields to change (artist, album, title, track number, ...) and
//! either set one value for every file or walk through the files one by one.
//! Every file is saved through a verified temporary copy, so an interrupted
//! or failed save never leaves a half-written file behind.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use std::error::Error;
use std::io;
use tagfix::cli;
use tagfix::config::CONFIG_KEYS;

#[derive(Parser)]
#[command(name = "tagfix")]
#[command(about = "Interactive batch editor for audio file tags")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Directory to start with (prompted for when omitted)
    directory: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new(CONFIG_KEYS.iter().copied()))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
    /// Print the configuration file path
    Path,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            cli::edit::handle_edit(cli.directory.as_deref())?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
            ConfigAction::Path => {
                cli::config::handle_config_path()?;
            }
        },
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
    }

    Ok(())
}
