//! Styles for the malcat CLI.
//!
//! Templates refer to styles by semantic name only (`score`, `title`, ...)
//! through the `style` filter; the actual colors live here. Unknown names
//! render the text unstyled.

use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const SCORE: &str = "score";
    pub const TITLE: &str = "title";
    pub const MUTED: &str = "muted";
    pub const INDEX: &str = "index";
    pub const HEADING: &str = "heading";
    pub const SENTINEL: &str = "sentinel";
}

pub static MALCAT_THEME: Lazy<HashMap<&'static str, Style>> = Lazy::new(|| {
    HashMap::from([
        (names::SCORE, Style::new().yellow().bold()),
        (names::TITLE, Style::new().bold()),
        (names::MUTED, Style::new().color256(246)),
        (names::INDEX, Style::new().cyan()),
        (names::HEADING, Style::new().green().bold()),
        (names::SENTINEL, Style::new().color256(246).italic()),
    ])
});

/// Applies the named style to `text`. With `use_color` off the text is
/// returned as is.
pub fn apply(name: &str, text: &str, use_color: bool) -> String {
    match MALCAT_THEME.get(name) {
        Some(style) if use_color => style.clone().force_styling(true).apply_to(text).to_string(),
        _ => text.to_string(),
    }
}
