use anyhow::{Context, Result};
use catalog::{seed, Movie, MovieStore};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use server::config::{DEFAULT_HOST, DEFAULT_PORT};
use server::ServerConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// Movies API - in-memory movie catalog over HTTP
#[derive(Parser)]
#[command(name = "movies-api")]
#[command(about = "CRUD HTTP service over an in-memory movie catalog", long_about = None)]
struct Cli {
    /// Seed file (JSON array of movies). Defaults to the embedded seed.
    #[arg(short, long, env = "MOVIES_SEED", global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Print the seed catalog
    List {
        /// Only show movies with this genre (case-insensitive)
        #[arg(long)]
        genre: Option<String>,
    },

    /// Validate the seed file without starting the server
    Check,
}

#[derive(Args)]
struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Origin allowed to read responses cross-origin (repeatable)
    #[arg(long = "allowed-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Serve(args) => handle_serve(cli.seed, args).await?,
        Commands::List { genre } => handle_list(cli.seed.as_deref(), genre.as_deref())?,
        Commands::Check => handle_check(cli.seed.as_deref())?,
    }

    Ok(())
}

fn load_store(seed_path: Option<&Path>) -> Result<MovieStore> {
    match seed_path {
        Some(path) => seed::load_from_file(path)
            .with_context(|| format!("Failed to load seed from {}", path.display())),
        None => seed::load_default().context("Failed to load embedded seed"),
    }
}

/// Handle the 'serve' command
async fn handle_serve(seed_path: Option<PathBuf>, args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig {
        host: args.host,
        port: args.port,
        seed: seed_path,
        ..Default::default()
    };
    if !args.allowed_origins.is_empty() {
        config.allowed_origins = args.allowed_origins;
    }
    info!("Starting movies-api on {}", config.addr());

    server::run(config).await
}

/// Handle the 'list' command
fn handle_list(seed_path: Option<&Path>, genre: Option<&str>) -> Result<()> {
    let store = load_store(seed_path)?;

    let movies: Vec<&Movie> = match genre {
        Some(genre) if !genre.is_empty() => store.list_by_genre(genre),
        _ => store.list_all().iter().collect(),
    };

    let header = match genre {
        Some(genre) if !genre.is_empty() => format!("Movies tagged '{}':", genre),
        _ => "Movies:".to_string(),
    };
    println!("{}", header.bold().blue());

    if movies.is_empty() {
        println!("  (none)");
    }
    for movie in movies {
        print_movie(movie);
    }
    Ok(())
}

/// Handle the 'check' command
fn handle_check(seed_path: Option<&Path>) -> Result<()> {
    let store = load_store(seed_path)?;
    println!(
        "{} Seed is valid: {} movies",
        "✓".green(),
        store.len()
    );
    Ok(())
}

/// Helper function to format one movie line
fn print_movie(movie: &Movie) {
    let genres = movie
        .genre
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{} {} ({}) [{}] - {} - {} min - rate {:.1}",
        "•".green(),
        movie.title.bold(),
        movie.year,
        genres,
        movie.director,
        movie.duration,
        movie.rate
    );
    println!("   {}", movie.id.to_string().dimmed());
}
