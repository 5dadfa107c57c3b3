pub mod api;
pub mod config;
pub mod content;
pub mod logging;
pub mod model;
pub mod routes;
pub mod search;
pub mod ui;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use tracing::warn;

use api::{ContentSource, WpClient};
use config::{API_ENV, AppConfig};
use search::render::{ResultRow, ResultsView, SegmentView, nothing_found_text};
use search::{SearchController, SearchState, SearchStatus};

static LONG_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}\nbuilt:  {}\ntarget: {}",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown"),
    )
});

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "blog-search",
    version,
    long_version = LONG_VERSION.as_str(),
    about = "Terminal reader and incremental search for a headless WordPress blog"
)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Content API base URL, e.g. https://example.com/wp-json/wp/v2
    #[arg(long, global = true)]
    pub api: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive reader
    Tui {
        /// Render once and exit (headless-friendly)
        #[arg(long, default_value_t = false)]
        once: bool,

        /// Override data dir (UI state and logs)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Run one search and print the highlighted results
    Search {
        query: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List posts, optionally for one category
    Posts {
        /// Category slug, or "all"
        #[arg(long, default_value = "all")]
        category: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        json: bool,
    },
    /// List categories that have posts
    Collections {
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "blog-search", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
        command => run_command(command, cli.config.as_deref(), cli.api).await,
    }
}

async fn run_command(command: Commands, config_path: Option<&Path>, api: Option<String>) -> Result<()> {
    let _log_guard = match &command {
        Commands::Tui { data_dir, .. } => {
            let dir = data_dir.clone().unwrap_or_else(default_data_dir);
            Some(logging::init_file(&dir.join("logs"))?)
        }
        _ => {
            logging::init_stderr();
            None
        }
    };

    let config = load_config(config_path, api)?;
    let client = Arc::new(WpClient::new(&config)?);

    match command {
        Commands::Tui { once, data_dir } => {
            let data_dir = data_dir.unwrap_or_else(default_data_dir);
            tokio::task::spawn_blocking(move || ui::tui::run_tui(&config, client, &data_dir, once))
                .await?
        }
        Commands::Search { query, json } => run_search(client, &config, query, json).await,
        Commands::Posts {
            category,
            page,
            json,
        } => run_posts(&client, &category, page, json).await,
        Commands::Collections { json } => run_collections(&client, json).await,
        Commands::Completions { .. } | Commands::Man => Ok(()),
    }
}

/// Config file and environment, then the `--api` flag on top.
pub fn load_config(path: Option<&Path>, api: Option<String>) -> Result<AppConfig> {
    let mut config = AppConfig::load(path)?;
    if let Some(api) = api {
        config.api_base = Some(api);
    }
    if config.api_base.is_none() {
        warn!("{API_ENV} is not set");
    }
    Ok(config)
}

/// Run one search to completion and build the rows the dialog would show.
///
/// `on_dispatch` runs once the request is out, before waiting on it.
pub async fn search_once<C: ContentSource>(
    source: Arc<C>,
    config: &AppConfig,
    query: String,
    on_dispatch: impl FnOnce(),
) -> Result<(SearchState, Vec<ResultRow>)> {
    let mut controller =
        SearchController::with_settings(source, config.debounce(), config.search_limit);
    controller.fetch_results(query);
    on_dispatch();
    while controller.is_busy() {
        controller.process_next().await;
    }

    let state = controller.state().clone();
    if state.status == SearchStatus::Error {
        return Err(anyhow!(
            state
                .error_message
                .clone()
                .unwrap_or_else(|| "search failed".to_string())
        ));
    }
    let rows = match ResultsView::for_state(&state) {
        Some(ResultsView::Rows(rows)) => rows,
        _ => Vec::new(),
    };
    Ok((state, rows))
}

async fn run_search(client: Arc<WpClient>, config: &AppConfig, query: String, json: bool) -> Result<()> {
    let spinner = if json {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        pb.set_message(format!("searching for \"{query}\""));
        Some(pb)
    };
    let outcome = search_once(client, config, query, || {
        if let Some(pb) = &spinner {
            pb.enable_steady_tick(Duration::from_millis(80));
        }
    })
    .await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let (state, rows) = outcome?;

    if json {
        let body = serde_json::json!({
            "query": state.query,
            "status": state.status.label(),
            "hits": rows,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if state.status == SearchStatus::Idle {
        eprintln!(
            "Type at least {} characters to search.",
            search::controller::MIN_QUERY_CHARS
        );
    } else if rows.is_empty() {
        println!("{}", nothing_found_text(&state.query));
    } else {
        for row in &rows {
            print_row(row, &config.site_url);
        }
    }
    Ok(())
}

fn colored_segments(segments: &[SegmentView], bold: bool) -> String {
    segments
        .iter()
        .map(|seg| {
            let text = if bold {
                seg.text.bold()
            } else {
                seg.text.normal()
            };
            if seg.highlighted {
                text.underline().cyan().to_string()
            } else {
                text.to_string()
            }
        })
        .collect()
}

fn print_row(row: &ResultRow, site_url: &str) {
    println!("{}", colored_segments(&row.title, true));
    if let Some(date) = &row.date {
        println!("  {}", date.dimmed());
    }
    println!("  {}", colored_segments(&row.excerpt, false));
    let link = format!("{}/blog/read/{}", site_url.trim_end_matches('/'), row.slug);
    println!("  {}\n", link.blue());
}

async fn run_posts(client: &WpClient, category: &str, page: u32, json: bool) -> Result<()> {
    let listing = client.posts_by_category(category, page).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }
    println!(
        "{}  page {}/{}",
        content::category_display_name(category).bold(),
        page.max(1),
        listing.total_pages.max(1)
    );
    for post in &listing.posts {
        let date = post.date.as_deref().map(content::format_date).unwrap_or_default();
        println!(
            "  {}  {}  {}",
            content::plain_text(&post.title),
            date.dimmed(),
            post.read_path().blue()
        );
    }
    Ok(())
}

async fn run_collections(client: &WpClient, json: bool) -> Result<()> {
    let entries = ui::tui::collections_from(client.get_categories().await?);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for cat in &entries {
        println!(
            "{:>4}  {}  {}",
            cat.count,
            content::collection_label(&cat.name),
            routes::Route::Category {
                slug: cat.slug.clone(),
                page: 1
            }
            .path()
            .blue()
        );
    }
    Ok(())
}

pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "ryznotes", "blog-search")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".blog-search"))
}
