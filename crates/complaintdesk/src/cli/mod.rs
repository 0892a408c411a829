//! Command-line interface for complaintdesk.
//!
//! This module provides the CLI structure for the `cmpdesk` binary and the
//! interactive session it can run.

mod commands;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    CategoryArg, ConfigCommand, ListCommand, OutputFormat, SearchCommand, StatusCommand,
    SubmitCommand, UrgencyArg,
};

/// cmpdesk - Submit and browse hospital complaints
///
/// Complaints are kept in a local origin database shared by every desk
/// pointed at the same file.
#[derive(Debug, Parser)]
#[command(name = "cmpdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a complaint
    Submit(SubmitCommand),

    /// List complaints
    List(ListCommand),

    /// Search complaints by name or category
    Search(SearchCommand),

    /// Show what the origin store holds
    Status(StatusCommand),

    /// Open an interactive desk
    Session,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "cmpdesk");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["cmpdesk", "session"]).verbosity(), Verbosity::Normal);
        assert_eq!(
            parse(&["cmpdesk", "-v", "session"]).verbosity(),
            Verbosity::Verbose
        );
        assert_eq!(
            parse(&["cmpdesk", "-vv", "session"]).verbosity(),
            Verbosity::Trace
        );
        assert_eq!(
            parse(&["cmpdesk", "-q", "-v", "session"]).verbosity(),
            Verbosity::Quiet
        );
    }

    #[test]
    fn test_parse_submit() {
        let cli = parse(&[
            "cmpdesk",
            "submit",
            "--name",
            "Alice",
            "--email",
            "a@x.com",
            "--description",
            "Overcharged",
            "--category",
            "billing",
            "--urgency",
            "high",
        ]);
        let Command::Submit(cmd) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(cmd.name, "Alice");
        assert_eq!(cmd.category, CategoryArg::Billing);
        assert_eq!(cmd.urgency, UrgencyArg::High);
        assert!(!cmd.json);
    }

    #[test]
    fn test_parse_submit_defaults() {
        let cli = parse(&[
            "cmpdesk", "submit", "-n", "Bob", "-e", "b@x.com", "-d", "Cold food",
        ]);
        let Command::Submit(cmd) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(cmd.category, CategoryArg::General);
        assert_eq!(cmd.urgency, UrgencyArg::Medium);
    }

    #[test]
    fn test_parse_submit_requires_name() {
        let result = Cli::try_parse_from(["cmpdesk", "submit", "-e", "b@x.com", "-d", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_multi_word_category() {
        let cli = parse(&[
            "cmpdesk", "submit", "-n", "Bob", "-e", "b@x.com", "-d", "Rude", "-C",
            "staff-behavior",
        ]);
        let Command::Submit(cmd) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(cmd.category, CategoryArg::StaffBehavior);
    }

    #[test]
    fn test_parse_list() {
        let cli = parse(&["cmpdesk", "list", "--search", "bil", "--format", "json"]);
        let Command::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.search.as_deref(), Some("bil"));
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_search() {
        let cli = parse(&["cmpdesk", "search", "general"]);
        let Command::Search(cmd) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(cmd.keyword, "general");
        assert_eq!(cmd.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_status() {
        let cli = parse(&["cmpdesk", "status", "--json"]);
        assert!(matches!(cli.command, Command::Status(StatusCommand { json: true })));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["cmpdesk", "config", "validate", "--file", "/tmp/c.toml"]);
        let Command::Config(ConfigCommand::Validate { file }) = cli.command else {
            panic!("expected config validate");
        };
        assert_eq!(file, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["cmpdesk", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
