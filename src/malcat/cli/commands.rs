//! # CLI Layer
//!
//! Dispatch for the `malcat` binary. The only code that reads the terminal,
//! writes to stdout/stderr and chooses an exit code.
//!
//! ## Structure
//!
//! - `run()`: main dispatch (called by `main.rs`)
//! - `init_context()`: builds `AppContext` with the API and renderer
//! - `handle_*()`: per-command handlers that call the API and print output

use super::render::{print_messages, Renderer};
use super::setup::{Cli, Commands, PageArg, SearchArgs};
use clap::Parser;
use console::Term;
use directories::ProjectDirs;
use malcat::api::CatalogApi;
use malcat::commands::config::ConfigAction;
use malcat::commands::{AutoPrompter, CmdMessage, CmdResult, MessageLevel, Prompter};
use malcat::config::CatalogConfig;
use malcat::error::{CatalogError, Result};
use malcat::form::FormData;
use malcat::search::SearchFilters;
use malcat::store::http::HttpBackend;
use malcat::view::{PageKind, ResultsView};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct AppContext {
    api: CatalogApi<HttpBackend>,
    renderer: Renderer,
}

/// Asks on the terminal. Anything but y/yes declines.
struct TermPrompter {
    term: Term,
}

impl TermPrompter {
    fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// One line of input; `None` when stdin is closed or the line is blank.
    fn ask(&self, question: &str) -> Option<String> {
        self.term.write_str(question).ok()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}

impl Prompter for TermPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        self.ask(&format!("{} [y/N] ", question))
            .is_some_and(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }
    let use_color = !cli.no_color && console::colors_enabled();
    let config_dir = config_dir()?;

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Search(SearchArgs::default()));
    let renderer = Renderer::new(use_color);
    if let Commands::Config { key, value } = &command {
        return handle_config(&config_dir, &renderer, key.clone(), value.clone());
    }

    let mut ctx = init_context(&config_dir, cli.api_url.as_deref(), renderer)?;
    match command {
        Commands::Search(args) => handle_search(&mut ctx, args),
        Commands::Options { page, medium } => handle_options(&mut ctx, page, medium),
        Commands::Show { id } => handle_show(&ctx, id),
        Commands::Insert {
            record_type,
            fields,
        } => handle_insert(&mut ctx, &record_type, fields),
        Commands::Update { id, fields } => handle_update(&mut ctx, id, fields),
        Commands::Delete { id, yes, search } => handle_delete(&mut ctx, id, yes, search),
        Commands::Score { id, score, search } => handle_score(&mut ctx, id, score, search),
        // Handled before the backend is built
        Commands::Config { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "malcat=debug" } else { "malcat=warn" };
    let filter = EnvFilter::try_from_env("MALCAT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests driving run() twice) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("MALCAT_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "malcat", "malcat")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| CatalogError::Config("Could not determine config dir".to_string()))
}

fn init_context(config_dir: &Path, api_url: Option<&str>, renderer: Renderer) -> Result<AppContext> {
    let mut config = CatalogConfig::load(config_dir)?;
    if let Some(url) = api_url {
        config.set_api_url(url)?;
    }
    let backend = HttpBackend::new(&config)?;
    Ok(AppContext {
        api: CatalogApi::new(backend, config),
        renderer,
    })
}

/// Prints messages and, when the command touched it, the results display.
fn finish(ctx: &AppContext, result: &CmdResult) -> ExitCode {
    print_messages(&result.messages);
    if let Some(results) = &result.results {
        print!("{}", ctx.renderer.results(results));
    }
    exit_code(result)
}

fn exit_code(result: &CmdResult) -> ExitCode {
    if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn form_from(fields: Vec<(String, String)>) -> FormData {
    fields
        .into_iter()
        .fold(FormData::new(), |form, (name, value)| form.with(name, value))
}

fn handle_search(ctx: &mut AppContext, args: SearchArgs) -> Result<ExitCode> {
    let result = ctx.api.search(&SearchFilters::from(args));
    // A fresh session only stays blank when the search itself failed
    if matches!(result.results, Some(ResultsView::Blank)) {
        return Err(CatalogError::Transport(format!(
            "search failed (backend at {})",
            ctx.api.backend().base_url()
        )));
    }
    Ok(finish(ctx, &result))
}

fn handle_options(ctx: &mut AppContext, page: PageArg, medium: Option<String>) -> Result<ExitCode> {
    let metadata = ctx.api.load_metadata();
    let kind = PageKind::from(page);
    let Some(mut view) = ctx.api.page(kind).page else {
        return Ok(ExitCode::SUCCESS);
    };
    if let Some(medium) = medium.filter(|_| kind == PageKind::Search) {
        ctx.api.select_medium(&mut view, &medium);
    }

    if metadata.is_empty() {
        print_messages(&[CmdMessage::warning(
            "Metadata unavailable; only the sentinel options are shown.",
        )]);
    }
    print!("{}", ctx.renderer.page(&view));
    Ok(ExitCode::SUCCESS)
}

fn handle_show(ctx: &AppContext, id: u64) -> Result<ExitCode> {
    let result = ctx.api.get_entry(id)?;
    if let Some(entry) = &result.entry {
        print!("{}", ctx.renderer.entry(entry));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_insert(
    ctx: &mut AppContext,
    record_type: &str,
    fields: Vec<(String, String)>,
) -> Result<ExitCode> {
    let result = ctx.api.submit(record_type, form_from(fields));
    Ok(finish(ctx, &result))
}

fn handle_update(ctx: &mut AppContext, id: u64, fields: Vec<(String, String)>) -> Result<ExitCode> {
    let result = ctx.api.edit_entry(id, &form_from(fields))?;
    Ok(finish(ctx, &result))
}

fn handle_delete(ctx: &mut AppContext, id: u64, yes: bool, search: SearchArgs) -> Result<ExitCode> {
    ctx.api.restore_filters(SearchFilters::from(search));
    let result = if yes {
        ctx.api.delete_entry(id, &mut AutoPrompter::yes())
    } else {
        ctx.api.delete_entry(id, &mut TermPrompter::new())
    };
    Ok(finish(ctx, &result))
}

fn handle_score(
    ctx: &mut AppContext,
    id: u64,
    score: Option<String>,
    search: SearchArgs,
) -> Result<ExitCode> {
    ctx.api.restore_filters(SearchFilters::from(search));
    let input = score.or_else(|| TermPrompter::new().ask("New score (0-10): "));
    let result = ctx.api.update_score(id, input.as_deref());
    Ok(finish(ctx, &result))
}

fn handle_config(
    config_dir: &Path,
    renderer: &Renderer,
    key: Option<String>,
    value: Option<String>,
) -> Result<ExitCode> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let result = malcat::commands::config::run(config_dir, action)?;

    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print!("{}", renderer.config(config));
        }
    }
    for message in &result.messages {
        match message.level {
            // Plain values so `malcat config api-url` can be scripted
            MessageLevel::Info => println!("{}", message.content),
            _ => print_messages(std::slice::from_ref(message)),
        }
    }
    Ok(exit_code(&result))
}
