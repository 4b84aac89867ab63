//! # Command Layer
//!
//! This module contains the **client logic** of malcat. Each command lives in
//! its own submodule and implements plain Rust functions over a
//! [`CatalogBackend`](crate::store::CatalogBackend) and the view model.
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Build requests from filters and forms
//! - Decide what a failure means for the user (swallow, log, report)
//! - Update the view model (`PageView`, `ResultsView`, `FormData`)
//! - Return structured `CmdResult` with messages and data
//!
//! ## What Commands Do NOT Do
//!
//! - **Terminal I/O**: no stdout or stderr; logging goes through `tracing`
//! - **Argument parsing**: that's the CLI layer's job
//! - **Exit codes**: return `Result`, let the caller decide
//!
//! Confirmation is the one interaction a command needs mid-flight; it asks
//! through the [`Prompter`] the UI hands in.
//!
//! ## Error Policy
//!
//! Passive loads (metadata, search) log failures and keep what was displayed.
//! User-initiated actions (delete, score, submit, update) always end in a
//! visible [`CmdMessage`]. Server messages are shown verbatim.
//!
//! ## Command Modules
//!
//! - [`metadata`]: Load the reference bundle and populate pages
//! - [`cascade`]: Medium-dependent filtering of the item-type dropdown
//! - [`search`]: Run a search and update the results display
//! - [`delete`]: Delete an entry after confirmation
//! - [`score`]: Quick score update from a result card
//! - [`submit`]: Insert a new entry from a form
//! - [`entry`]: Edit view (fetch, pre-fill, update)
//! - [`config`]: Manage configuration

use crate::config::CatalogConfig;
use crate::form::FormData;
use crate::model::EntryDetail;
use crate::view::{PageView, ResultsView};
use serde::Serialize;

pub mod cascade;
pub mod config;
pub mod delete;
pub mod entry;
pub mod metadata;
pub mod score;
pub mod search;
pub mod submit;

/// User interaction a command may need before it sends a request.
pub trait Prompter {
    /// Blocking yes/no question. `false` means declined.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Prompter with a fixed answer, for scripted use (`--yes`) and tests.
#[derive(Debug, Clone)]
pub struct AutoPrompter {
    answer: bool,
    asked: Vec<String>,
}

impl AutoPrompter {
    pub fn yes() -> Self {
        Self {
            answer: true,
            asked: Vec::new(),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for AutoPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        self.asked.push(question.to_string());
        self.answer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Results display after the command, when it touched it.
    pub results: Option<ResultsView>,
    /// A populated page.
    pub page: Option<PageView>,
    /// Id of an entry the command created.
    pub entry_id: Option<u64>,
    /// An entry fetched for display or editing.
    pub entry: Option<EntryDetail>,
    /// The form after submission (reset on success).
    pub form: Option<FormData>,
    pub config: Option<CatalogConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_results(mut self, results: ResultsView) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_page(mut self, page: PageView) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_entry(mut self, entry: EntryDetail) -> Self {
        self.entry = Some(entry);
        self
    }

    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_config(mut self, config: CatalogConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// True if any message is an error.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
