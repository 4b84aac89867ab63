//! # CLI Templates
//!
//! Terminal output is rendered from minijinja templates kept as stand-alone
//! files in `templates/` and embedded here at compile time.
//!
//! Templates only choose what to print and which semantic style to use (the
//! `style` filter). Widths, padding and truncation are computed in Rust
//! before the data reaches them. Line breaks are explicit: block tags trim
//! the newline that follows them.

pub const RESULTS_TEMPLATE: &str = include_str!("templates/results.tmp");
pub const PAGE_TEMPLATE: &str = include_str!("templates/page.tmp");
pub const ENTRY_TEMPLATE: &str = include_str!("templates/entry.tmp");
pub const CONFIG_TEMPLATE: &str = include_str!("templates/config.tmp");
