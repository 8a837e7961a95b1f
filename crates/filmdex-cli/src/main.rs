//! filmdex - movie, TV and person metadata from TMDB.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use filmdex_api::tmdb::{
    CreditsKind, ImageCategory, ImageLoaderOptions, LocalTmdbApi, MediaType, SearchMultiParams,
    TmdbClient, TrendingMedia, get_list_item, lists_for, tmdb_loader,
};
use filmdex_api::youtube::{LocalYoutubeApi, YoutubeClient};
use serde_json::Value;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, TMDB_API_KEY_ENV, YOUTUBE_API_KEY_ENV, resolve_config_path};

/// User-Agent sent with every API request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the built-in movie and TV listings.
    Lists(ListsArgs),
    /// Look up a single listing by media type and keyword.
    ListItem(ListItemArgs),
    /// Subcommands that query TMDB.
    #[command(flatten)]
    Tmdb(TmdbCommands),
    /// Fetch YouTube video details.
    Youtube(YoutubeArgs),
    /// Build an image CDN URL.
    ImageUrl(ImageUrlArgs),
    /// Show the image widths served per category.
    Sizes(SizesArgs),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Subcommands that query TMDB.
#[derive(Subcommand)]
enum TmdbCommands {
    /// Fetch a movie listing (e.g. popular, top_rated).
    Movies(ListingArgs),
    /// Fetch a single movie with videos, credits and images.
    Movie(IdArgs),
    /// Fetch recommendations for a movie.
    MovieRecommended(PagedIdArgs),
    /// Fetch a TV listing (e.g. on_the_air, airing_today).
    TvShows(ListingArgs),
    /// Fetch a single TV show with videos, credits and images.
    TvShow(IdArgs),
    /// Fetch recommendations for a TV show.
    TvRecommended(PagedIdArgs),
    /// Fetch the episodes of a TV season.
    Episodes(EpisodesArgs),
    /// Fetch the weekly trending list.
    Trending(TrendingArgs),
    /// Discover movies or TV shows by genre.
    Discover(DiscoverArgs),
    /// Fetch a person's credits.
    Credits(CreditsArgs),
    /// List genres for movies or TV.
    Genres(MediaArgs),
    /// Fetch a single person with images and credits.
    Person(IdArgs),
    /// Search movies, TV shows and people.
    Search(SearchArgs),
}

/// Arguments for the `lists` subcommand.
#[derive(clap::Args)]
struct ListsArgs {
    /// Only show this media type (movie, tv).
    #[arg(long)]
    media: Option<MediaType>,
}

/// Arguments for the `list-item` subcommand.
#[derive(clap::Args)]
struct ListItemArgs {
    /// Media type (movie, tv).
    #[arg(long, required = true)]
    media: String,
    /// Listing keyword (e.g. "popular").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `movies` and `tv-shows` subcommands.
#[derive(clap::Args)]
struct ListingArgs {
    /// Listing keyword.
    #[arg(long, default_value = "popular")]
    query: String,
    /// Result page (default: 1).
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for single-resource subcommands.
#[derive(clap::Args)]
struct IdArgs {
    /// TMDB id.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for recommendation subcommands.
#[derive(clap::Args)]
struct PagedIdArgs {
    /// TMDB id.
    #[arg(long, required = true)]
    id: u64,
    /// Result page (default: 1).
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for the `episodes` subcommand.
#[derive(clap::Args)]
struct EpisodesArgs {
    /// TMDB series id.
    #[arg(long, required = true)]
    id: u64,
    /// Season number.
    #[arg(long, required = true)]
    season: u32,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Media filter (all, movie, tv, person).
    #[arg(long, default_value = "all")]
    media: TrendingMedia,
    /// Result page (default: 1).
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Media type (movie, tv).
    #[arg(long, required = true)]
    media: MediaType,
    /// Genre id(s), comma-separated.
    #[arg(long, required = true)]
    genre: String,
    /// Result page (default: 1).
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for the `credits` subcommand.
#[derive(clap::Args)]
struct CreditsArgs {
    /// TMDB person id.
    #[arg(long, required = true)]
    id: u64,
    /// Credits kind (movie, tv, combined).
    #[arg(long, default_value = "combined")]
    kind: CreditsKind,
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct MediaArgs {
    /// Media type (movie, tv).
    #[arg(long, required = true)]
    media: MediaType,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    #[arg(long, required = true)]
    query: String,
    /// Result page (default: 1).
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for the `youtube` subcommand.
#[derive(clap::Args)]
struct YoutubeArgs {
    /// YouTube video id.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `image-url` subcommand.
#[derive(clap::Args)]
struct ImageUrlArgs {
    /// Relative image path (e.g. "/abc.jpg").
    #[arg(long, required = true)]
    src: String,
    /// Width in pixels. Omit for the original size.
    #[arg(long)]
    width: Option<u32>,
}

/// Arguments for the `sizes` subcommand.
#[derive(clap::Args)]
struct SizesArgs {
    /// Only show this category (poster, logo, backdrop, still, profile).
    #[arg(long)]
    category: Option<ImageCategory>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the config file path.
    Path,
    /// Store credentials in the config file.
    Set(ConfigSetArgs),
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct ConfigSetArgs {
    /// TMDB v3 API key.
    #[arg(long)]
    tmdb_api_key: Option<String>,
    /// TMDB base URL override.
    #[arg(long)]
    tmdb_base_url: Option<Url>,
    /// YouTube Data API key.
    #[arg(long)]
    youtube_api_key: Option<String>,
}

/// Loads config from disk and applies environment overrides.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
}

/// Builds a `TmdbClient` from config and `TMDB_API_KEY`.
///
/// # Errors
///
/// Returns an error if no API key is configured or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(dir: Option<&PathBuf>) -> Result<TmdbClient> {
    let config = load_config(dir)?;
    let Some(api_key) = config.tmdb.api_key else {
        bail!(
            "TMDB API key is required (set {TMDB_API_KEY_ENV} or [tmdb] api_key in config.toml)"
        );
    };

    let mut builder = TmdbClient::builder().api_key(api_key).user_agent(USER_AGENT);
    if let Some(base_url) = config.tmdb.base_url {
        let url = Url::parse(&base_url)
            .with_context(|| format!("invalid [tmdb] base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds a `YoutubeClient` from config and `YOUTUBE_API_KEY`.
///
/// # Errors
///
/// Returns an error if no API key is configured or the client fails to build.
#[instrument(skip_all)]
fn build_youtube_client(dir: Option<&PathBuf>) -> Result<YoutubeClient> {
    let config = load_config(dir)?;
    let Some(api_key) = config.youtube.api_key else {
        bail!(
            "YouTube API key is required (set {YOUTUBE_API_KEY_ENV} or [youtube] api_key in config.toml)"
        );
    };

    YoutubeClient::builder()
        .api_key(api_key)
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build YouTube client")
}

/// Logs a JSON value, pretty-printed.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
fn emit_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to format JSON output")?;
    tracing::info!("{text}");
    Ok(())
}

/// Runs the `lists` subcommand.
fn run_lists(args: &ListsArgs) {
    let media = args
        .media
        .map_or_else(|| vec![MediaType::Movie, MediaType::Tv], |m| vec![m]);
    for m in media {
        tracing::info!("[{m}]");
        for list in lists_for(m) {
            tracing::info!("{}\t{}", list.query, list.title);
        }
    }
}

/// Runs the `list-item` subcommand.
///
/// # Errors
///
/// Returns an error if the media type or keyword is unknown.
fn run_list_item(args: &ListItemArgs) -> Result<()> {
    let Some(item) = get_list_item(&args.media, &args.query) else {
        bail!("no listing '{}' for media type '{}'", args.query, args.media);
    };
    tracing::info!("{}\t{}", item.query, item.title);
    Ok(())
}

/// Runs the `image-url` subcommand.
fn run_image_url(args: &ImageUrlArgs) {
    let options = ImageLoaderOptions {
        src: args.src.clone(),
        width: args.width,
        ..ImageLoaderOptions::default()
    };
    tracing::info!("{}", tmdb_loader(&options));
}

/// Runs the `sizes` subcommand.
fn run_sizes(args: &SizesArgs) {
    let categories = args
        .category
        .map_or_else(|| ImageCategory::ALL.to_vec(), |c| vec![c]);
    for category in categories {
        let widths: Vec<String> = category
            .supported_widths()
            .iter()
            .map(ToString::to_string)
            .collect();
        tracing::info!("{category}\t{}", widths.join(","));
    }
}

/// Runs the `config` subcommands.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
fn run_config(cmd: &ConfigCommand, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    match &cmd.command {
        ConfigSubcommands::Path => {
            tracing::info!("{}", config_path.display());
        }
        ConfigSubcommands::Set(args) => {
            let mut config = AppConfig::load(&config_path).context("failed to load config")?;
            if let Some(key) = &args.tmdb_api_key {
                config.tmdb.api_key = Some(key.clone());
            }
            if let Some(url) = &args.tmdb_base_url {
                config.tmdb.base_url = Some(url.to_string());
            }
            if let Some(key) = &args.youtube_api_key {
                config.youtube.api_key = Some(key.clone());
            }
            config.save(&config_path)?;
            tracing::info!("Saved {}", config_path.display());
        }
    }
    Ok(())
}

/// Runs a subcommand that talks to TMDB.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb(command: &TmdbCommands, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;

    let value = match command {
        TmdbCommands::Movies(args) => client.movies(&args.query, args.page).await,
        TmdbCommands::Movie(args) => client.movie(args.id).await,
        TmdbCommands::MovieRecommended(args) => {
            client.movie_recommended(args.id, args.page).await
        }
        TmdbCommands::TvShows(args) => client.tv_shows(&args.query, args.page).await,
        TmdbCommands::TvShow(args) => client.tv_show(args.id).await,
        TmdbCommands::TvRecommended(args) => {
            client.tv_show_recommended(args.id, args.page).await
        }
        TmdbCommands::Episodes(args) => client.tv_show_episodes(args.id, args.season).await,
        TmdbCommands::Trending(args) => client.trending(args.media, args.page).await,
        TmdbCommands::Discover(args) => {
            client
                .media_by_genre(args.media, &args.genre, args.page)
                .await
        }
        TmdbCommands::Credits(args) => client.credits(args.id, args.kind).await,
        TmdbCommands::Genres(args) => client.genre_list(args.media).await,
        TmdbCommands::Person(args) => client.person(args.id).await,
        TmdbCommands::Search(args) => {
            let mut params = SearchMultiParams::new(&args.query);
            if let Some(page) = args.page {
                params = params.page(page);
            }
            client.search(&params).await
        }
    }
    .context("TMDB request failed")?;

    emit_json(&value)
}

/// Runs the `youtube` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_youtube(args: &YoutubeArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_youtube_client(dir)?;
    let value = client
        .video(&args.id)
        .await
        .context("YouTube videos request failed")?;
    emit_json(&value)
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match &cli.command {
        Commands::Lists(args) => {
            run_lists(args);
            Ok(())
        }
        Commands::ListItem(args) => run_list_item(args),
        Commands::ImageUrl(args) => {
            run_image_url(args);
            Ok(())
        }
        Commands::Sizes(args) => {
            run_sizes(args);
            Ok(())
        }
        Commands::Youtube(args) => run_youtube(args, dir).await,
        Commands::Config(cmd) => run_config(cmd, dir),
        Commands::Tmdb(command) => run_tmdb(command, dir).await,
    }
}
