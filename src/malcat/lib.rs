//! # Malcat Architecture
//!
//! Malcat is a **UI-agnostic client library** for a personal anime/manga
//! catalog served over HTTP. It is not a CLI that happens to have library
//! code; it is a library that happens to ship a CLI client.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders pages and cards, prompts       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns metadata, search session and configuration          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Cascading filters, search, delete, score, submit, edit   │
//! │  - Operates on the view model, returns CmdResult            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Backend Layer (store/)                                     │
//! │  - Abstract CatalogBackend trait                            │
//! │  - HttpBackend (production), InMemoryBackend (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The View Model
//!
//! There is no DOM here. A page is a [`view::PageView`]: a fixed set of
//! [`view::Dropdown`]s keyed by [`view::ControlId`]. Search results are a
//! [`view::ResultsView`]. Commands mutate or produce these; clients draw them.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust arguments and returns regular Rust types
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** calls `std::process::exit`
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: thorough unit tests against `InMemoryBackend`, which
//!    records every request and can be told to fail.
//! 2. **API**: dispatch tests.
//! 3. **CLI**: integration tests in `tests/` driving the binary.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Client logic for each operation
//! - [`store`]: Backend abstraction and implementations
//! - [`model`]: Records, entries, reference items, record types
//! - [`metadata`]: The reference collection store
//! - [`view`]: Dropdowns, pages and result cards
//! - [`search`]: Search filters, query building, search sequencing
//! - [`form`]: Form data, field cardinality and request payloads
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and templated rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod metadata;
pub mod model;
pub mod search;
pub mod store;
pub mod view;
