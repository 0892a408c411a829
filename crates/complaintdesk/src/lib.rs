//! `complaintdesk` - Submit and browse hospital complaints
//!
//! This library provides the complaint desk component: a form that turns input
//! into complaint records, a store that keeps them in one slot of a local
//! origin database, and a searchable list over the collection.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod complaint;
pub mod config;
pub mod desk;
pub mod error;
pub mod form;
pub mod logging;
pub mod notice;
pub mod render;
pub mod storage;
pub mod viewer;

pub use complaint::{Category, ComplaintId, ComplaintRecord, Urgency};
pub use config::Config;
pub use desk::{ComplaintDesk, DeskSettings, FormState, Notice};
pub use error::{Error, Result};
pub use form::{FieldEdit, FormFields};
pub use logging::init_logging;
pub use render::Theme;
pub use storage::{MemorySlots, RecordStore, SlotRecordStore, SlotStore, SqliteSlots};
pub use viewer::ListView;
