//! Interactive desk session.
//!
//! Reads one command per line and waits on the notice timer at the same time,
//! so a submission notice clears itself while the user is idle.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::desk::ComplaintDesk;
use crate::error::{Error, Result};
use crate::form::FieldEdit;
use crate::render::{self, Style};
use crate::storage::RecordStore;

const HELP: &str = "\
Commands:
  set <field> <value>   Change a form field (name, email, category, description, urgency)
  form                  Show the form
  submit                Submit the form
  search [keyword]      Filter the list by name or category; no keyword clears
  list                  Show the complaint list
  theme                 Switch between light and dark mode
  help                  Show this help
  quit                  Leave the session";

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Change a form field.
    Set(FieldEdit),
    /// Show the form.
    Form,
    /// Submit the form.
    Submit,
    /// Replace the search keyword.
    Search(String),
    /// Show the list.
    List,
    /// Flip the theme.
    Theme,
    /// Show help.
    Help,
    /// Leave.
    Quit,
    /// Blank line.
    Nothing,
}

impl SessionCommand {
    /// Parse one input line.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown command, or a `set` with a bad field
    /// or value.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Nothing),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(f, v)| (f, v.trim()));
                if field.is_empty() {
                    return Err(Error::Usage("set <field> <value>"));
                }
                Ok(Self::Set(FieldEdit::parse(field, value)?))
            }
            "form" => Ok(Self::Form),
            "submit" => Ok(Self::Submit),
            "search" => Ok(Self::Search(rest.to_string())),
            "list" => Ok(Self::List),
            "theme" => Ok(Self::Theme),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}

/// Whether the session keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run a session on `desk` until `input` ends or the user quits.
///
/// The desk is torn down on the way out.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<S, R, W>(
    desk: &mut ComplaintDesk<S>,
    input: R,
    out: &mut W,
    color: bool,
) -> Result<()>
where
    S: RecordStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "Hospital Complaint System (type 'help' for commands)")?;
    out.flush()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Session input closed");
                    break;
                };
                let flow = match SessionCommand::parse(&line) {
                    Ok(command) => execute(desk, command, out, color)?,
                    Err(e) => {
                        writeln!(out, "Error: {e}")?;
                        Flow::Continue
                    }
                };
                out.flush()?;
                if flow == Flow::Quit {
                    break;
                }
            }
            Some(notice) = desk.next_notice_expiry() => {
                writeln!(out, "(notice for {} cleared)", notice.id)?;
                out.flush()?;
            }
        }
    }

    desk.teardown();
    Ok(())
}

fn execute<S, W>(
    desk: &mut ComplaintDesk<S>,
    command: SessionCommand,
    out: &mut W,
    color: bool,
) -> Result<Flow>
where
    S: RecordStore,
    W: Write,
{
    let style = Style {
        theme: desk.theme(),
        color,
    };

    match command {
        SessionCommand::Nothing => {}
        SessionCommand::Set(edit) => desk.edit(edit),
        SessionCommand::Form => writeln!(out, "{}", render::form(desk.form()))?,
        SessionCommand::Submit => match desk.submit() {
            Ok(notice) => {
                writeln!(out, "{}", render::celebration(style))?;
                writeln!(out, "{}", render::notice(&notice))?;
            }
            Err(e) => writeln!(out, "Error: {e}")?,
        },
        SessionCommand::Search(keyword) => {
            desk.set_search(&keyword);
            writeln!(out, "{}", render::table(&desk.view(), style))?;
        }
        SessionCommand::List => writeln!(out, "{}", render::table(&desk.view(), style))?,
        SessionCommand::Theme => {
            let theme = desk.toggle_theme();
            writeln!(
                out,
                "Switched to {theme} mode ('theme' again for {})",
                theme.toggle_label()
            )?;
        }
        SessionCommand::Help => writeln!(out, "{HELP}")?,
        SessionCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::io::{AsyncWriteExt, BufReader};

    use super::*;
    use crate::complaint::{Category, Urgency};
    use crate::desk::DeskSettings;
    use crate::storage::{MemorySlots, SlotRecordStore};

    type MemoryDesk = ComplaintDesk<SlotRecordStore<Arc<MemorySlots>>>;

    fn desk(slots: &Arc<MemorySlots>) -> MemoryDesk {
        let store = SlotRecordStore::new(Arc::clone(slots));
        ComplaintDesk::with_rng(store, DeskSettings::default(), StdRng::seed_from_u64(1)).unwrap()
    }

    async fn run_script(desk: &mut MemoryDesk, script: &str) -> String {
        let mut out = Vec::new();
        run(desk, BufReader::new(script.as_bytes()), &mut out, false)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(SessionCommand::parse("").unwrap(), SessionCommand::Nothing);
        assert_eq!(SessionCommand::parse(" LIST ").unwrap(), SessionCommand::List);
        assert_eq!(SessionCommand::parse("exit").unwrap(), SessionCommand::Quit);
        assert_eq!(
            SessionCommand::parse("search  Medical Care").unwrap(),
            SessionCommand::Search("Medical Care".to_string())
        );
        assert_eq!(
            SessionCommand::parse("search").unwrap(),
            SessionCommand::Search(String::new())
        );
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            SessionCommand::parse("set name Alice Smith").unwrap(),
            SessionCommand::Set(FieldEdit::Name("Alice Smith".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("set category staff behavior").unwrap(),
            SessionCommand::Set(FieldEdit::Category(Category::StaffBehavior))
        );
        assert_eq!(
            SessionCommand::parse("set urgency high").unwrap(),
            SessionCommand::Set(FieldEdit::Urgency(Urgency::High))
        );
        assert_eq!(
            SessionCommand::parse("set description").unwrap(),
            SessionCommand::Set(FieldEdit::Description(String::new()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(SessionCommand::parse("dance").is_err());
        assert!(SessionCommand::parse("set").is_err());
        assert!(SessionCommand::parse("set colour red").is_err());
        assert!(SessionCommand::parse("set urgency extreme").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_submit_and_search() {
        let slots = Arc::new(MemorySlots::new());
        let mut desk = desk(&slots);

        let out = run_script(
            &mut desk,
            "set name Alice\n\
             set email a@x.com\n\
             set category billing\n\
             set description Overcharged\n\
             submit\n\
             search bil\n\
             quit\n\
             list\n",
        )
        .await;

        let id = desk.records()[0].id;
        assert!(out.contains("Complaint Submitted!"));
        assert!(out.contains(&format!("Your complaint ID is: {id}")));
        assert!(out.contains("Alice"));
        assert_eq!(desk.records().len(), 1);
        assert_eq!(desk.search_keyword(), "bil");
        assert!(!desk.is_notice_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_reports_input_errors() {
        let slots = Arc::new(MemorySlots::new());
        let mut desk = desk(&slots);

        let out = run_script(&mut desk, "submit\nset colour red\nwhat\n").await;

        assert!(out.contains("Error: name is required"));
        assert!(out.contains("Error: unknown field 'colour'"));
        assert!(out.contains("unknown command 'what'"));
        assert!(desk.records().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_bare_set_prints_usage() {
        let slots = Arc::new(MemorySlots::new());
        let mut desk = desk(&slots);

        let out = run_script(&mut desk, "set\nset   \n").await;

        assert_eq!(out.matches("Error: usage: set <field> <value>").count(), 2);
        assert!(!out.contains("unknown field"));
        assert!(matches!(
            SessionCommand::parse("set"),
            Err(Error::Usage("set <field> <value>"))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_empty_list_and_theme() {
        let slots = Arc::new(MemorySlots::new());
        let mut desk = desk(&slots);

        let out = run_script(&mut desk, "list\ntheme\nhelp\n").await;

        assert!(out.contains(render::NO_RESULTS));
        assert!(out.contains("Switched to dark mode ('theme' again for Light Mode)"));
        assert!(out.contains("Commands:"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_clears_notice_while_idle() {
        let slots = Arc::new(MemorySlots::new());
        let mut desk = desk(&slots);
        let (reader, mut writer) = tokio::io::duplex(1024);

        let typist = tokio::spawn(async move {
            writer
                .write_all(b"set name Alice\nset email a@x.com\nset description Cold\nsubmit\n")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(6_000)).await;
            writer.write_all(b"quit\n").await.unwrap();
        });

        let mut out = Vec::new();
        run(&mut desk, BufReader::new(reader), &mut out, false)
            .await
            .unwrap();
        typist.await.unwrap();

        let out = String::from_utf8(out).unwrap();
        let id = desk.records()[0].id;
        assert!(out.contains(&format!("(notice for {id} cleared)")));
        assert!(desk.notice().is_none());
    }
}
