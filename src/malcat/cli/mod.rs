//! # CLI Behavior
//!
//! This is **one possible UI client** for malcat, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! For the overall architecture, see the crate-level documentation of the
//! `malcat` library.
//!
//! ## Naked Execution (`malcat`)
//!
//! Running `malcat` with no arguments searches with no filters, which shows
//! the first `default-limit` entries.
//!
//! ## Pages Without a Browser
//!
//! `malcat options [search|anime|manga]` loads the metadata bundle and prints
//! every dropdown of that page, sentinel first, exactly as the page would
//! offer them. `--medium manga` applies the medium cascade to the search
//! page's item types.
//!
//! ## Forms
//!
//! `insert` and `update` take `name=value` fields. Repeating a name is how a
//! multi-select submits several values (`genres=1 genres=4`).
//!
//! ## Confirmation
//!
//! `delete` asks before sending anything; `--yes` skips the question.
//! `score` without a value prompts for one; a blank answer cancels.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print output
//! - `render`: Template rendering (cards, pages, entries, config)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling
//! - `templates`: Output templates

mod commands;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;
