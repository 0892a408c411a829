//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::complaint::{Category, Urgency};
use crate::form::FieldEdit;

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Full name of the complainant
    #[arg(short, long)]
    pub name: String,

    /// Contact email
    #[arg(short, long)]
    pub email: String,

    /// What happened
    #[arg(short, long)]
    pub description: String,

    /// Complaint category
    #[arg(short = 'C', long, value_enum, default_value = "general")]
    pub category: CategoryArg,

    /// How pressing it is
    #[arg(short, long, value_enum, default_value = "medium")]
    pub urgency: UrgencyArg,

    /// Output the notice as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl SubmitCommand {
    /// The form edits this command describes, in form order.
    #[must_use]
    pub fn edits(&self) -> [FieldEdit; 5] {
        [
            FieldEdit::Name(self.name.clone()),
            FieldEdit::Email(self.email.clone()),
            FieldEdit::Category(self.category.into()),
            FieldEdit::Description(self.description.clone()),
            FieldEdit::Urgency(self.urgency.into()),
        ]
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show complaints whose name or category contains this
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Keyword matched against name and category, ignoring case
    pub keyword: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Category argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// General
    General,
    /// Billing
    Billing,
    /// Medical Care
    MedicalCare,
    /// Staff Behavior
    StaffBehavior,
    /// Facilities
    Facilities,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::General => Self::General,
            CategoryArg::Billing => Self::Billing,
            CategoryArg::MedicalCare => Self::MedicalCare,
            CategoryArg::StaffBehavior => Self::StaffBehavior,
            CategoryArg::Facilities => Self::Facilities,
        }
    }
}

/// Urgency argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UrgencyArg {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

impl From<UrgencyArg> for Urgency {
    fn from(arg: UrgencyArg) -> Self {
        match arg {
            UrgencyArg::Low => Self::Low,
            UrgencyArg::Medium => Self::Medium,
            UrgencyArg::High => Self::High,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
