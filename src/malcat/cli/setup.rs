use clap::{Args, Parser, Subcommand, ValueEnum};
use malcat::search::SearchFilters;
use malcat::view::PageKind;

#[derive(Parser, Debug)]
#[command(
    name = "malcat",
    bin_name = "malcat",
    version,
    disable_help_subcommand = true,
    after_help = "Running `malcat` with no command searches with no filters."
)]
#[command(about = "Search, browse and edit a personal anime/manga catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the catalog backend (overrides the config file)
    #[arg(long, global = true, env = "MALCAT_API_URL", help_heading = "Options")]
    pub api_url: Option<String>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog
    #[command(alias = "s", display_order = 1)]
    Search(SearchArgs),

    /// Show the dropdown options of a page
    #[command(display_order = 2)]
    Options {
        /// Page whose controls to show
        #[arg(value_enum, default_value_t = PageArg::Search)]
        page: PageArg,

        /// Restrict item types to one medium (search page)
        #[arg(long)]
        medium: Option<String>,
    },

    /// Show one entry with all of its fields
    #[command(alias = "v", display_order = 3)]
    Show { id: u64 },

    /// Insert a new entry from name=value fields
    #[command(display_order = 4)]
    Insert {
        /// Record type (anime, manga, ...)
        record_type: String,

        /// Form fields; repeat a name for multi-selects (genres=1 genres=4)
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Update fields of an existing entry
    #[command(display_order = 5)]
    Update {
        id: u64,

        /// Changed fields; every value of a named field is replaced
        #[arg(value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },

    /// Delete an entry
    #[command(alias = "rm", display_order = 6)]
    Delete {
        id: u64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Set the score of an entry (prompts when no score is given)
    #[command(display_order = 7)]
    Score {
        id: u64,
        score: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Show or set configuration (api-url, default-limit, timeout)
    #[command(display_order = 8)]
    Config { key: Option<String>, value: Option<String> },
}

/// Search filters. Empty values and "all" are not sent.
#[derive(Args, Debug, Default, Clone)]
pub struct SearchArgs {
    /// Title substring
    #[arg(long)]
    pub title: Option<String>,

    /// Medium (anime, manga or all)
    #[arg(long)]
    pub medium: Option<String>,

    /// Minimum score
    #[arg(long)]
    pub score_min: Option<String>,

    /// Item type id
    #[arg(long = "type")]
    pub item_type: Option<String>,

    /// Status id
    #[arg(long)]
    pub status: Option<String>,

    /// Source id
    #[arg(long)]
    pub source: Option<String>,

    /// Age rating id
    #[arg(long)]
    pub rating: Option<String>,

    /// Genre id
    #[arg(long)]
    pub genre: Option<String>,

    /// Theme id
    #[arg(long)]
    pub theme: Option<String>,

    /// Premiere season
    #[arg(long)]
    pub season: Option<String>,

    /// Premiere year
    #[arg(long)]
    pub year: Option<String>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<String>,
}

impl From<SearchArgs> for SearchFilters {
    fn from(args: SearchArgs) -> Self {
        SearchFilters {
            title: args.title.unwrap_or_default(),
            medium: args.medium.unwrap_or_default(),
            score_min: args.score_min.unwrap_or_default(),
            item_type_id: args.item_type.unwrap_or_default(),
            status_id: args.status.unwrap_or_default(),
            source_id: args.source.unwrap_or_default(),
            age_rating_id: args.rating.unwrap_or_default(),
            genre_id: args.genre.unwrap_or_default(),
            theme_id: args.theme.unwrap_or_default(),
            season: args.season.unwrap_or_default(),
            year: args.year.unwrap_or_default(),
            limit: args.limit.unwrap_or_default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PageArg {
    Search,
    Anime,
    Manga,
}

impl From<PageArg> for PageKind {
    fn from(page: PageArg) -> Self {
        match page {
            PageArg::Search => PageKind::Search,
            PageArg::Anime => PageKind::InsertAnime,
            PageArg::Manga => PageKind::InsertManga,
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    malcat::form::FormData::parse_pair(raw)
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_flags_map_onto_filters() {
        let cli = Cli::try_parse_from([
            "malcat", "search", "--title", "bebop", "--medium", "anime", "--type", "4",
        ])
        .unwrap();
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        let filters = SearchFilters::from(args);
        assert_eq!(filters.title, "bebop");
        assert_eq!(filters.medium, "anime");
        assert_eq!(filters.item_type_id, "4");
        assert_eq!(filters.limit, "");
    }

    #[test]
    fn insert_fields_split_on_first_equals() {
        let cli = Cli::try_parse_from([
            "malcat",
            "insert",
            "anime",
            "title_name=Re=Zero",
            "genres=1",
            "genres=4",
        ])
        .unwrap();
        let Some(Commands::Insert { record_type, fields }) = cli.command else {
            panic!("expected insert");
        };
        assert_eq!(record_type, "anime");
        assert_eq!(fields[0], ("title_name".to_string(), "Re=Zero".to_string()));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn malformed_field_is_rejected() {
        assert!(Cli::try_parse_from(["malcat", "insert", "anime", "title_name"]).is_err());
    }
}
