//! Command line interface

use clap::{Parser, Subcommand};
use resmatch_display::DisplayMode;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "resmatch", version, about)]
pub struct Cli {
    /// Configuration file (default: %APPDATA%\resmatch\config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use a simulated display instead of the real one, e.g. `--mock=legacy`
    #[arg(
        long,
        global = true,
        value_name = "PROFILE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "laptop",
        value_parser = ["laptop", "desktop", "no-driver", "legacy"]
    )]
    pub mock: Option<String>,

    /// Write logs to this file (the interactive UI logs nowhere otherwise)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive resolution picker (default)
    Tui,

    /// Print the current resolution
    Current,

    /// List the resolutions this machine supports
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Change the resolution, e.g. `resmatch set 1366x768`
    Set {
        mode: DisplayMode,

        /// Apply without asking the driver first
        #[arg(long)]
        no_probe: bool,
    },

    /// Put back a resolution recorded earlier, without probing
    Restore { mode: DisplayMode },

    /// Describe the video adapter and driver
    Driver,
}

impl Cli {
    /// Whether the interactive UI owns the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Command::Tui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_tui() {
        let cli = Cli::try_parse_from(["resmatch"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.is_interactive());
        assert!(cli.mock.is_none());
    }

    #[test]
    fn test_set_parses_mode() {
        let cli = Cli::try_parse_from(["resmatch", "set", "1366x768", "--no-probe"]).unwrap();
        match cli.command {
            Some(Command::Set { mode, no_probe }) => {
                assert_eq!(mode, DisplayMode::new(1366, 768));
                assert!(no_probe);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!Cli::try_parse_from(["resmatch", "set", "1366x768"]).unwrap().is_interactive());
    }

    #[test]
    fn test_set_rejects_bad_mode() {
        assert!(Cli::try_parse_from(["resmatch", "set", "big"]).is_err());
    }

    #[test]
    fn test_mock_flag() {
        let cli = Cli::try_parse_from(["resmatch", "list", "--mock"]).unwrap();
        assert_eq!(cli.mock.as_deref(), Some("laptop"));

        let cli = Cli::try_parse_from(["resmatch", "--mock=desktop", "current"]).unwrap();
        assert_eq!(cli.mock.as_deref(), Some("desktop"));
        assert!(matches!(cli.command, Some(Command::Current)));
    }

    #[test]
    fn test_mock_flag_leaves_subcommand_alone() {
        let cli = Cli::try_parse_from(["resmatch", "--mock", "list"]).unwrap();
        assert_eq!(cli.mock.as_deref(), Some("laptop"));
        assert!(matches!(cli.command, Some(Command::List { json: false })));
    }

    #[test]
    fn test_mock_rejects_unknown_profile() {
        assert!(Cli::try_parse_from(["resmatch", "--mock=server", "list"]).is_err());
    }
}
