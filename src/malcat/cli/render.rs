//! # Rendering Module
//!
//! Styled terminal output from minijinja templates.
//!
//! Layout calculations (width, truncation, padding) stay in Rust because they
//! need Unicode-aware processing. Templates pick what to print and which
//! semantic style applies; [`super::styles`] maps styles to colors.

use super::styles;
use super::templates::{CONFIG_TEMPLATE, ENTRY_TEMPLATE, PAGE_TEMPLATE, RESULTS_TEMPLATE};
use colored::Colorize;
use malcat::commands::{CmdMessage, MessageLevel};
use malcat::config::{CatalogConfig, CONFIG_KEYS};
use malcat::model::{value_to_string, EntryDetail};
use malcat::view::{PageView, ResultsView, NO_RESULTS_MESSAGE};
use minijinja::{Environment, Value};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const TITLE_WIDTH: usize = 48;
const INDENT: &str = "  ";

#[derive(Serialize)]
struct CardLine {
    id: String,
    score: String,
    title: String,
    padding: String,
    type_label: String,
    status: String,
    details: String,
    age_rating: String,
}

#[derive(Serialize)]
struct ResultsData {
    empty: bool,
    empty_message: &'static str,
    cards: Vec<CardLine>,
}

#[derive(Serialize)]
struct OptionLine {
    value: String,
    padding: String,
    label: String,
    sentinel: bool,
}

#[derive(Serialize)]
struct ControlData {
    id: &'static str,
    multiple: bool,
    options: Vec<OptionLine>,
}

#[derive(Serialize)]
struct PageData {
    indent: &'static str,
    controls: Vec<ControlData>,
}

#[derive(Serialize)]
struct KeyValueLine {
    name: String,
    padding: String,
    value: String,
}

#[derive(Serialize)]
struct EntryData {
    indent: &'static str,
    title: String,
    id_label: String,
    fields: Vec<KeyValueLine>,
}

#[derive(Serialize)]
struct ConfigLine {
    key: &'static str,
    padding: String,
    value: String,
}

#[derive(Serialize)]
struct ConfigData {
    items: Vec<ConfigLine>,
}

/// Template renderer with the `style` filter registered.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(use_color: bool) -> Self {
        let mut env = Environment::new();
        env.add_filter("style", move |value: Value, name: String| -> String {
            styles::apply(&name, &value.to_string(), use_color)
        });
        Self { env }
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> Option<String> {
        self.env.render_str(template, data).ok()
    }

    pub fn results(&self, view: &ResultsView) -> String {
        if matches!(view, ResultsView::Blank) {
            return String::new();
        }

        let cards: Vec<CardLine> = view
            .cards()
            .iter()
            .map(|card| {
                let title = truncate_to_width(&card.title, TITLE_WIDTH);
                CardLine {
                    id: format!("{:>5}", card.entry_id),
                    score: format!("{:>5}", card.score),
                    padding: padding(&title, TITLE_WIDTH),
                    title,
                    type_label: card.type_label.clone(),
                    status: card.status.clone(),
                    details: card.details.clone(),
                    age_rating: card.age_rating.clone(),
                }
            })
            .collect();

        let data = ResultsData {
            empty: cards.is_empty(),
            empty_message: NO_RESULTS_MESSAGE,
            cards,
        };
        self.render(RESULTS_TEMPLATE, &data)
            .unwrap_or_else(|| plain_results(view))
    }

    pub fn page(&self, page: &PageView) -> String {
        let controls: Vec<ControlData> = page
            .dropdowns()
            .map(|(id, dropdown)| {
                let width = dropdown
                    .options()
                    .iter()
                    .map(|o| o.value.width())
                    .max()
                    .unwrap_or(0);
                ControlData {
                    id: id.element_id(),
                    multiple: dropdown.is_multiple(),
                    options: dropdown
                        .options()
                        .iter()
                        .map(|o| OptionLine {
                            padding: padding(&o.value, width),
                            value: o.value.clone(),
                            label: o.label.clone(),
                            sentinel: o.is_sentinel(),
                        })
                        .collect(),
                }
            })
            .collect();

        let data = PageData {
            indent: INDENT,
            controls,
        };
        self.render(PAGE_TEMPLATE, &data).unwrap_or_default()
    }

    pub fn entry(&self, entry: &EntryDetail) -> String {
        let mut rows: Vec<(String, String)> = Vec::new();
        if let Some(medium) = &entry.medium_type {
            rows.push(("medium_type".to_string(), medium.clone()));
        }
        for (name, value) in &entry.fields {
            let text = match value {
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(value_to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                other => value_to_string(other),
            };
            rows.push((name.clone(), text));
        }

        let width = rows.iter().map(|(n, _)| n.width()).max().unwrap_or(0);
        let data = EntryData {
            indent: INDENT,
            title: entry.title_name.clone(),
            id_label: format!("#{}", entry.entry_id),
            fields: rows
                .into_iter()
                .map(|(name, value)| KeyValueLine {
                    padding: padding(&name, width),
                    name,
                    value,
                })
                .collect(),
        };
        self.render(ENTRY_TEMPLATE, &data)
            .unwrap_or_else(|| format!("{} #{}\n", entry.title_name, entry.entry_id))
    }

    pub fn config(&self, config: &CatalogConfig) -> String {
        let width = CONFIG_KEYS.iter().map(|k| k.width()).max().unwrap_or(0);
        let items = CONFIG_KEYS
            .iter()
            .map(|&key| ConfigLine {
                key,
                padding: padding(key, width),
                value: config.get(key).unwrap_or_default(),
            })
            .collect();
        self.render(CONFIG_TEMPLATE, &ConfigData { items })
            .unwrap_or_default()
    }
}

fn plain_results(view: &ResultsView) -> String {
    match view {
        ResultsView::Blank => String::new(),
        ResultsView::NoResults => format!("{}\n", NO_RESULTS_MESSAGE),
        ResultsView::Cards(cards) => cards
            .iter()
            .map(|c| format!("{} {} {}\n", c.entry_id, c.score, c.title))
            .collect(),
    }
}

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

fn padding(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text.width()))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
