use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ranked_visualizer::api::{self, state::AppState};
use ranked_visualizer::calculate::{self, Graph};
use ranked_visualizer::config::AppConfig;
use ranked_visualizer::extract::PlayerDocument;
use ranked_visualizer::fetch::{Fetcher, FilePageSource, PageSource};
use ranked_visualizer::models::DateRange;

#[derive(Parser)]
#[command(name = "ranked-visualizer")]
#[command(about = "Ranked match history statistics for fighting game players")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct PageArgs {
    /// Fetch the page of this player
    #[arg(long)]
    player_id: Option<String>,

    /// Read a saved player page instead of fetching
    #[arg(long)]
    html: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    DailyGains,
    WinRates,
    Distribution,
    Stats,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Compute one view and print it as JSON
    Analyze {
        #[command(flatten)]
        page: PageArgs,

        /// Character to analyze (ignored by the stats view)
        #[arg(long)]
        character: Option<String>,

        #[arg(long, value_enum)]
        view: View,

        /// Start date (YYYY-MM-DD), requires --to
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD), requires --from
        #[arg(long)]
        to: Option<String>,

        /// Prepend a Total row to the win rate view (`--include-total false`
        /// turns it off when the config enables it)
        #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
        include_total: Option<bool>,
    },

    /// List the characters a player has ranked matches with
    Characters {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting ranked-visualizer v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                source: Arc::new(Fetcher::new(&config.fetch)?),
                columns: Arc::new(config.columns.clone()),
                views: config.views.clone(),
            };
            let app = api::build_router(state).layer(api::cors_layer(&config.server.cors_origin));

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Analyze {
            page,
            character,
            view,
            from,
            to,
            include_total,
        } => {
            // Reject a half-open range before fetching anything
            let range = DateRange::parse_bounds(from.as_deref(), to.as_deref())?;
            let (player_id, markup) = load_page(&config, &page).await?;
            let document = PlayerDocument::parse(&markup);
            let history = document.match_history(&config.columns, None)?;

            let output = match view {
                View::Stats => {
                    let ratings = document.ratings()?;
                    let stats =
                        calculate::character_stats(&history.filter_range(range.as_ref()), &ratings);
                    serde_json::to_string_pretty(&stats)?
                }
                graph_view => {
                    let Some(character) = character else {
                        bail!("--character is required for this view");
                    };
                    let graph = match graph_view {
                        View::DailyGains => Graph::DailyGains,
                        View::WinRates => Graph::WinRates,
                        _ => Graph::Distribution,
                    };
                    let matches = calculate::select_character(&history, &character)?
                        .filter_range(range.as_ref());
                    let total_row = config.views.total_row(include_total);
                    serde_json::to_string_pretty(&calculate::compute_graph(
                        graph, &matches, total_row,
                    ))?
                }
            };

            tracing::debug!("Analyzed {} matches for {}", history.len(), player_id);
            println!("{}", output);
        }
        Commands::Characters { page } => {
            let (_, markup) = load_page(&config, &page).await?;
            let history = PlayerDocument::parse(&markup).match_history(&config.columns, None)?;
            for character in history.characters() {
                println!(
                    "{}\t{} matches",
                    character,
                    history.for_character(character).len()
                );
            }
        }
    }

    Ok(())
}

/// Fetch or read the page selected by `page`.
async fn load_page(config: &AppConfig, page: &PageArgs) -> Result<(String, String)> {
    let (player_id, source): (String, Box<dyn PageSource>) = match (&page.player_id, &page.html) {
        (Some(id), _) => (id.clone(), Box::new(Fetcher::new(&config.fetch)?)),
        (None, Some(path)) => (
            path.display().to_string(),
            Box::new(FilePageSource::new(path)),
        ),
        (None, None) => bail!("Specify --player-id or --html"),
    };

    let markup = source.fetch_player_page(&player_id).await?;
    Ok((player_id, markup))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn include_total(args: &[&str]) -> Option<bool> {
        let base = ["ranked-visualizer", "analyze", "--html", "page.html", "--view", "win-rates"];
        let cli = Cli::try_parse_from(base.iter().chain(args).copied()).unwrap();
        match cli.command {
            Commands::Analyze { include_total, .. } => include_total,
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_include_total_flag() {
        assert_eq!(include_total(&[]), None);
        assert_eq!(include_total(&["--include-total"]), Some(true));
        assert_eq!(include_total(&["--include-total", "true"]), Some(true));
        assert_eq!(include_total(&["--include-total", "false"]), Some(false));
    }
}
