//! The complaint desk: form, collection, search and notice in one component.
//!
//! A [`ComplaintDesk`] is owned by one task. Handlers take `&mut self` and run
//! to completion; the only thing that happens without a handler is the notice
//! expiring, which the owner picks up with [`ComplaintDesk::next_notice_expiry`].

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::complaint::{ComplaintId, ComplaintRecord};
use crate::config::Config;
use crate::error::Result;
use crate::form::{FieldEdit, FormFields};
use crate::notice::NoticeClock;
use crate::render::Theme;
use crate::storage::{Appended, RecordStore};
use crate::viewer::{ListView, SearchBox};

/// Behaviour knobs for a desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeskSettings {
    /// How long a submission notice stays up.
    pub notice_duration: Duration,
    /// How many times to redraw an id that is already taken.
    pub id_redraws: u8,
    /// Initial presentation mode.
    pub theme: Theme,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            notice_duration: Duration::from_millis(5_000),
            id_redraws: 0,
            theme: Theme::Light,
        }
    }
}

impl From<&Config> for DeskSettings {
    fn from(config: &Config) -> Self {
        Self {
            notice_duration: config.notice_duration(),
            id_redraws: config.form.id_redraws,
            theme: config.display.theme,
        }
    }
}

/// The confirmation shown after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Id given to the new complaint.
    pub id: ComplaintId,
    /// Whether the collection reached the backend.
    pub durable: bool,
    /// Whether an earlier complaint already had this id.
    pub duplicate_id: bool,
}

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    /// Accepting input, no notice shown.
    #[default]
    Editing,
    /// A notice is shown until its timer runs out.
    Submitted(Notice),
}

/// The complaint submission and browsing component.
#[derive(Debug)]
pub struct ComplaintDesk<S> {
    store: S,
    records: Vec<ComplaintRecord>,
    form: FormFields,
    state: FormState,
    search: SearchBox,
    theme: Theme,
    settings: DeskSettings,
    rng: StdRng,
    clock: NoticeClock,
}

impl<S: RecordStore> ComplaintDesk<S> {
    /// Mount a desk on `store`, loading the persisted collection.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn mount(store: S, settings: DeskSettings) -> Result<Self> {
        Self::with_rng(store, settings, StdRng::from_entropy())
    }

    /// Mount a desk that draws ids from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn with_rng(store: S, settings: DeskSettings, rng: StdRng) -> Result<Self> {
        let clock = NoticeClock::new()?;
        let records = store.load();
        debug!(count = records.len(), "Mounted complaint desk");

        Ok(Self {
            store,
            records,
            form: FormFields::default(),
            state: FormState::Editing,
            search: SearchBox::default(),
            theme: settings.theme,
            settings,
            rng,
            clock,
        })
    }

    /// Change one form field.
    pub fn edit(&mut self, edit: FieldEdit) {
        self.form.apply(edit);
    }

    /// Submit the form.
    ///
    /// On success the record is appended, the form is cleared and a notice is
    /// shown for the configured duration. A resubmission while a notice is up
    /// replaces it and restarts its timer.
    ///
    /// # Errors
    ///
    /// Returns an input error if a required field is empty or the email is
    /// malformed. Nothing changes in that case. Storage failures are not
    /// errors here: they are reported through [`Notice::durable`].
    pub fn submit(&mut self) -> Result<Notice> {
        if let Err(e) = self.form.check() {
            debug!(error = %e, "Submission refused");
            return Err(e);
        }

        let (id, duplicate_id) = self.draw_id();
        let record = self.form.to_record(id);

        let Appended { records, persisted } = self.store.append(&self.records, record);
        self.records = records;
        let durable = persisted.is_ok();

        self.form.reset();
        self.clock.arm(self.settings.notice_duration);

        let notice = Notice {
            id,
            durable,
            duplicate_id,
        };
        self.state = FormState::Submitted(notice);

        info!(%id, durable, count = self.records.len(), "Complaint submitted");
        Ok(notice)
    }

    /// Wait until the current notice expires, then return to editing.
    ///
    /// Returns the notice that was cleared. Never resolves while no notice is
    /// up. Cancel-safe, so it can sit in a `select!` next to input handling.
    pub async fn next_notice_expiry(&mut self) -> Option<Notice> {
        self.clock.expired().await;
        self.clear_notice()
    }

    /// Apply a notice expiry that has already fired, without waiting.
    pub fn try_notice_expiry(&mut self) -> Option<Notice> {
        self.clock.try_expired()?;
        self.clear_notice()
    }

    /// Replace the search keyword.
    pub fn set_search(&mut self, keyword: &str) {
        self.search.set(keyword);
    }

    /// Empty the search keyword.
    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Flip between light and dark mode, returning the new mode.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        debug!(theme = %self.theme, "Toggled theme");
        self.theme
    }

    /// Stop the notice timer. The desk is inert afterwards.
    pub fn teardown(&mut self) {
        self.clock.disarm();
        debug!("Tore down complaint desk");
    }

    /// The filtered list for the current keyword.
    #[must_use]
    pub fn view(&self) -> ListView<'_> {
        ListView::build(&self.records, self.search.keyword())
    }

    /// Every record, in submission order.
    #[must_use]
    pub fn records(&self) -> &[ComplaintRecord] {
        &self.records
    }

    /// Current form values.
    #[must_use]
    pub fn form(&self) -> &FormFields {
        &self.form
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    /// The notice on display, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        match &self.state {
            FormState::Submitted(notice) => Some(notice),
            FormState::Editing => None,
        }
    }

    /// Current search keyword (lowercase).
    #[must_use]
    pub fn search_keyword(&self) -> &str {
        self.search.keyword()
    }

    /// Current presentation mode.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether a notice timer is running.
    #[must_use]
    pub fn is_notice_pending(&self) -> bool {
        self.clock.is_armed()
    }

    /// The persistence collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn draw_id(&mut self) -> (ComplaintId, bool) {
        let mut id = ComplaintId::generate(&mut self.rng);
        for _ in 0..self.settings.id_redraws {
            if !self.is_taken(id) {
                break;
            }
            debug!(%id, "Redrawing taken complaint id");
            id = ComplaintId::generate(&mut self.rng);
        }

        let duplicate = self.is_taken(id);
        if duplicate {
            warn!(%id, "Complaint id is already in use");
        }
        (id, duplicate)
    }

    fn is_taken(&self, id: ComplaintId) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    fn clear_notice(&mut self) -> Option<Notice> {
        match std::mem::take(&mut self.state) {
            FormState::Submitted(notice) => {
                debug!(id = %notice.id, "Notice expired");
                Some(notice)
            }
            FormState::Editing => None,
        }
    }
}
