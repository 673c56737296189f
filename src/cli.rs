//! Command-line interface for dubsh
//!
//! Provides argument parsing using clap derive macros.

use crate::mapping::parse_assignment;
use crate::stream::ResponseMode;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Dubbing client: pick voices for transcript speakers and run the backend
#[derive(Parser, Debug)]
#[command(
    name = "dubsh",
    version,
    about = "Pick voices for transcript speakers and run the dubbing backend"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress incremental log lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: debug diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a `--mode` value.
fn parse_mode(s: &str) -> Result<ResponseMode, String> {
    s.parse()
}

/// Parse a `--voice SPEAKER=VOICE` value.
fn parse_voice(s: &str) -> Result<(String, String), String> {
    parse_assignment(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the speakers found in a transcript
    Speakers {
        /// Transcript file
        file: PathBuf,
    },

    /// Show the voice catalog in effect
    Voices {
        /// Comma-separated voice list to use instead of the configured catalog
        #[arg(long, value_name = "LIST")]
        list: Option<String>,
    },

    /// Send a transcript to the backend and follow its progress
    Submit {
        /// Transcript file
        file: Option<PathBuf>,

        /// Assign a voice to a speaker (repeatable; empty voice means automatic)
        #[arg(long = "voice", value_name = "SPEAKER=VOICE", value_parser = parse_voice)]
        voices: Vec<(String, String)>,

        /// Ask for each speaker's voice on the terminal
        #[arg(short, long, conflicts_with = "voices")]
        interactive: bool,

        /// Backend base URL (overrides config)
        #[arg(long, value_name = "URL")]
        server: Option<String>,

        /// Comma-separated voice catalog (overrides config)
        #[arg(long = "voices", value_name = "LIST")]
        catalog: Option<String>,

        /// Response handling: auto, stream or document
        #[arg(long, value_name = "MODE", value_parser = parse_mode)]
        mode: Option<ResponseMode>,

        /// Save every produced artifact into this directory
        #[arg(long, value_name = "DIR")]
        save_to: Option<PathBuf>,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Dump,
    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["dubsh"]).is_err());
    }

    #[test]
    fn test_parse_speakers() {
        let cli = Cli::try_parse_from(["dubsh", "speakers", "talk.txt"]).unwrap();
        match cli.command {
            Commands::Speakers { file } => assert_eq!(file, PathBuf::from("talk.txt")),
            _ => panic!("Expected Speakers command"),
        }
    }

    #[test]
    fn test_parse_voices_with_list() {
        let cli = Cli::try_parse_from(["dubsh", "voices", "--list", "Kore,Puck"]).unwrap();
        match cli.command {
            Commands::Voices { list } => assert_eq!(list.as_deref(), Some("Kore,Puck")),
            _ => panic!("Expected Voices command"),
        }
    }

    #[test]
    fn test_parse_submit_defaults() {
        let cli = Cli::try_parse_from(["dubsh", "submit", "talk.txt"]).unwrap();
        match cli.command {
            Commands::Submit {
                file,
                voices,
                interactive,
                server,
                catalog,
                mode,
                save_to,
            } => {
                assert_eq!(file, Some(PathBuf::from("talk.txt")));
                assert!(voices.is_empty());
                assert!(!interactive);
                assert!(server.is_none());
                assert!(catalog.is_none());
                assert!(mode.is_none());
                assert!(save_to.is_none());
            }
            _ => panic!("Expected Submit command"),
        }
    }

    #[test]
    fn test_parse_submit_without_file() {
        let cli = Cli::try_parse_from(["dubsh", "submit"]).unwrap();
        match cli.command {
            Commands::Submit { file, .. } => assert!(file.is_none()),
            _ => panic!("Expected Submit command"),
        }
    }

    #[test]
    fn test_parse_submit_with_options() {
        let cli = Cli::try_parse_from([
            "dubsh",
            "submit",
            "talk.txt",
            "--voice",
            "Alice=Kore",
            "--voice",
            "Bob=",
            "--server",
            "http://dub:8000",
            "--voices",
            "Kore,Puck",
            "--mode",
            "stream",
            "--save-to",
            "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit {
                voices,
                interactive,
                server,
                catalog,
                mode,
                save_to,
                ..
            } => {
                assert_eq!(
                    voices,
                    vec![
                        ("Alice".to_string(), "Kore".to_string()),
                        ("Bob".to_string(), String::new()),
                    ]
                );
                assert!(!interactive);
                assert_eq!(server.as_deref(), Some("http://dub:8000"));
                assert_eq!(catalog.as_deref(), Some("Kore,Puck"));
                assert_eq!(mode, Some(ResponseMode::Stream));
                assert_eq!(save_to, Some(PathBuf::from("out")));
            }
            _ => panic!("Expected Submit command"),
        }
    }

    #[test]
    fn test_parse_submit_rejects_bad_assignment() {
        assert!(Cli::try_parse_from(["dubsh", "submit", "t.txt", "--voice", "Kore"]).is_err());
    }

    #[test]
    fn test_parse_submit_interactive_conflicts_with_presets() {
        assert!(
            Cli::try_parse_from(["dubsh", "submit", "t.txt", "-i", "--voice", "A=Kore"]).is_err()
        );
    }

    #[test]
    fn test_parse_submit_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["dubsh", "submit", "t.txt", "--mode", "sse"]).is_err());
    }

    #[test]
    fn test_parse_verbose_single() {
        let cli = Cli::try_parse_from(["dubsh", "-v", "voices"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_verbose_repeated_flags() {
        let cli = Cli::try_parse_from(["dubsh", "voices", "-v", "-v"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_global_config_and_quiet() {
        let cli = Cli::try_parse_from([
            "dubsh",
            "--config",
            "/path/to/config.toml",
            "submit",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_config_actions() {
        let cli = Cli::try_parse_from(["dubsh", "config", "dump"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Dump
            }
        ));
        let cli = Cli::try_parse_from(["dubsh", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Path
            }
        ));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["dubsh", "completions", "bash"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
