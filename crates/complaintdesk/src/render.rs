//! Text rendering for the complaint desk.
//!
//! Everything here is presentational. Functions take what the desk exposes and
//! return strings; printing is left to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::complaint::{Category, Urgency};
use crate::desk::Notice;
use crate::error::Result;
use crate::form::FormFields;
use crate::viewer::{ListView, UrgencyTier};

/// Placeholder shown when no complaint matches.
pub const NO_RESULTS: &str = "No complaints found";

const HEADERS: [&str; 5] = ["ID", "Name", "Email", "Category", "Urgency"];

const RESET: &str = "\x1b[0m";

/// Presentation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// The other mode.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label of the control that switches away from this mode.
    #[must_use]
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Dark Mode",
            Self::Dark => "Light Mode",
        }
    }

    fn badge_code(self, tier: UrgencyTier) -> &'static str {
        match (self, tier) {
            (Self::Light, UrgencyTier::Strong) => "\x1b[1;31m",
            (Self::Light, UrgencyTier::Moderate) => "\x1b[33m",
            (Self::Light, UrgencyTier::Mild) => "\x1b[32m",
            (Self::Dark, UrgencyTier::Strong) => "\x1b[1;91m",
            (Self::Dark, UrgencyTier::Moderate) => "\x1b[93m",
            (Self::Dark, UrgencyTier::Mild) => "\x1b[92m",
        }
    }

    fn muted_code(self) -> &'static str {
        match self {
            Self::Light => "\x1b[90m",
            Self::Dark => "\x1b[37m",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

/// How table output is styled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    /// Palette to use.
    pub theme: Theme,
    /// Whether to emit ANSI colour at all.
    pub color: bool,
}

impl Style {
    fn paint(self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn badge(self, urgency: Urgency, width: usize) -> String {
        let padded = format!("{:<width$}", urgency.as_str());
        self.paint(self.theme.badge_code(urgency.into()), &padded)
    }
}

/// One line per record: `CMP-12345  Alice <a@x.com>  Billing  High`.
#[must_use]
pub fn plain(view: &ListView<'_>) -> String {
    match view {
        ListView::NoResults => NO_RESULTS.to_string(),
        ListView::Rows(rows) => rows
            .iter()
            .map(|row| {
                let r = row.record;
                format!(
                    "{}  {} <{}>  {}  {}",
                    r.id, r.name, r.email, r.category, r.urgency
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Aligned table with an urgency badge column.
#[must_use]
pub fn table(view: &ListView<'_>, style: Style) -> String {
    let cells: Vec<[String; 5]> = match view {
        ListView::NoResults => Vec::new(),
        ListView::Rows(rows) => rows
            .iter()
            .map(|row| {
                let r = row.record;
                [
                    r.id.to_string(),
                    r.name.clone(),
                    r.email.clone(),
                    r.category.to_string(),
                    r.urgency.to_string(),
                ]
            })
            .collect(),
    };

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w))
        .collect::<Vec<_>>()
        .join("  ");
    let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);

    let mut lines = vec![header.trim_end().to_string(), "-".repeat(total)];

    let ListView::Rows(rows) = view else {
        let placeholder = format!("{:^total$}", NO_RESULTS);
        lines.push(style.paint(style.theme.muted_code(), placeholder.trim_end()));
        return lines.join("\n");
    };

    for (row, text) in rows.iter().zip(&cells) {
        let mut line = text[..4]
            .iter()
            .zip(widths)
            .map(|(cell, w)| pad(cell, w))
            .collect::<Vec<_>>()
            .join("  ");
        line.push_str("  ");
        line.push_str(&style.badge(row.record.urgency, widths[4]));
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Matched records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn json(view: &ListView<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&view.records())?)
}

/// The confirmation block shown while a notice is up.
#[must_use]
pub fn notice(notice: &Notice) -> String {
    let mut lines = vec![
        "Complaint Submitted!".to_string(),
        format!("Your complaint ID is: {}", notice.id),
        "We'll review your complaint shortly.".to_string(),
    ];
    if !notice.durable {
        lines.push("Warning: this complaint could not be saved and will be lost when the desk closes.".to_string());
    }
    if notice.duplicate_id {
        lines.push(format!("Note: {} is also the id of an earlier complaint.", notice.id));
    }
    lines.join("\n")
}

/// The cosmetic burst printed on a successful submission.
#[must_use]
pub fn celebration(style: Style) -> String {
    const BURST: &str = "*  .  *  .  *  .  *  .  *";
    if !style.color {
        return BURST.to_string();
    }
    let codes = [
        style.theme.badge_code(UrgencyTier::Strong),
        style.theme.badge_code(UrgencyTier::Moderate),
        style.theme.badge_code(UrgencyTier::Mild),
    ];
    BURST
        .split(' ')
        .enumerate()
        .map(|(i, piece)| {
            if piece.is_empty() {
                String::new()
            } else {
                style.paint(codes[i % codes.len()], piece)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The form as it currently stands, with the choices for each selector.
#[must_use]
pub fn form(fields: &FormFields) -> String {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    let urgencies: Vec<&str> = Urgency::ALL.iter().map(|u| u.as_str()).collect();

    [
        format!("Full Name:    {}", fields.name),
        format!("Email:        {}", fields.email),
        format!(
            "Category:     {}",
            choices(&categories, fields.category.as_str())
        ),
        format!("Description:  {}", fields.description),
        format!(
            "Urgency:      {}",
            choices(&urgencies, fields.urgency.as_str())
        ),
    ]
    .join("\n")
}

fn choices(all: &[&str], current: &str) -> String {
    all.iter()
        .map(|c| {
            if *c == current {
                format!("[{c}]")
            } else {
                (*c).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}
