mod query;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::config::{
    LONG_PREDICTIONS_DOWNLOAD_URL, SHORT_PREDICTIONS_URL, SHORT_PREDICTIONS_VIEW_URL,
    SHORT_RATINGS_URL, SHORT_RATINGS_VIEW_URL,
};
use data_loader::{DataSource, Dataset, DatasetMode, LoaderConfig};
use session::{Session, UserSelector, DEFAULT_RANKED_MOVIES, DEFAULT_RECOMMENDATIONS};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use query::{run_query, Query};

/// mubi-recs - explore MUBI users' ratings and the model's recommendations
#[derive(Parser)]
#[command(name = "mubi-recs")]
#[command(about = "Explore MUBI users' ratings and collaborative-filtering recommendations", long_about = None)]
struct Cli {
    /// Which predictions table to use
    #[arg(long, value_enum, default_value_t = ModeArg::Short)]
    mode: ModeArg,

    /// Ratings table (URL or path), defaults to the shared sheet
    #[arg(long, env = "MUBI_RATINGS")]
    ratings: Option<DataSource>,

    /// Predictions table (URL or path), defaults depend on --mode
    #[arg(long, env = "MUBI_PREDICTIONS")]
    predictions: Option<DataSource>,

    /// Translation JSON file
    #[arg(long, env = "MUBI_TRANSLATION")]
    translation: Option<PathBuf>,

    /// Number of movies the prediction model covers
    #[arg(long)]
    catalog_size: Option<usize>,

    /// Timeout for remote fetches, in seconds
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// User to look at: an external MUBI id or "random"
    #[arg(short, long, default_value = "random")]
    user: UserSelector,

    /// Seed for random user selection and tie breaking
    #[arg(long)]
    seed: Option<u64>,

    /// Print values as JSON instead of sentences
    #[arg(long)]
    json: bool,

    /// Don't print the welcome banner
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Five curated users, predictions from the shared sheet
    Short,
    /// 1000 users, predictions from a downloaded user_recs.csv
    Long,
}

impl From<ModeArg> for DatasetMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Short => DatasetMode::Short,
            ModeArg::Long => DatasetMode::Long,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the user's average rating
    Mean,

    /// Suggest movies the user hasn't rated yet
    Recommend {
        /// Number of recommendations (1-20)
        #[arg(short = 'n', long, default_value_t = DEFAULT_RECOMMENDATIONS)]
        count: usize,
    },

    /// Show the user's highest rated movies
    Top {
        #[arg(short = 'n', long, default_value_t = DEFAULT_RANKED_MOVIES)]
        count: usize,
    },

    /// Show the user's lowest rated movies
    Bottom {
        #[arg(short = 'n', long, default_value_t = DEFAULT_RANKED_MOVIES)]
        count: usize,
    },

    /// How often the model's prediction was close to the user's rating
    Accuracy,

    /// Number of ratings the user has on record
    Reviews,

    /// All of the numbers above in one go
    Summary,

    /// Interactive loop: switch users and run queries without reloading
    Shell,
}

impl Commands {
    fn query(&self) -> Option<Query> {
        match *self {
            Commands::Mean => Some(Query::Mean),
            Commands::Recommend { count } => Some(Query::Recommend(count)),
            Commands::Top { count } => Some(Query::Top(count)),
            Commands::Bottom { count } => Some(Query::Bottom(count)),
            Commands::Accuracy => Some(Query::Accuracy),
            Commands::Reviews => Some(Query::Reviews),
            Commands::Summary => Some(Query::Summary),
            Commands::Shell => None,
        }
    }
}

fn main() -> Result<()> {
    // Before the subscriber, so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Logs go to stderr so report output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = build_config(&cli);
    if !cli.quiet && !cli.json {
        print_welcome(&config);
    }

    let start = Instant::now();
    let dataset = Dataset::load(&config).context("Failed to load MUBI dataset")?;
    tracing::info!("Loaded dataset in {:?}", start.elapsed());

    let mut session = match cli.seed {
        Some(seed) => Session::with_seed(dataset, seed),
        None => Session::new(dataset),
    };
    let user = session
        .set_active_user(cli.user)
        .with_context(|| format!("Failed to select user {}", cli.user))?;
    if !cli.json {
        println!(
            "{} {}",
            "Showing user".green(),
            user.external_id.to_string().bold()
        );
    }

    match cli.command.query() {
        Some(query) => run_query(&mut session, query, cli.json, &mut io::stdout()),
        None => shell::run_shell(&mut session, cli.json, io::stdin().lock(), io::stdout()),
    }
}

/// Per-mode defaults with any command-line or environment overrides on top
fn build_config(cli: &Cli) -> LoaderConfig {
    let mut config = LoaderConfig::for_mode(cli.mode.into())
        .with_fetch_timeout(Duration::from_secs(cli.timeout_secs));

    if let Some(ratings) = &cli.ratings {
        config = config.with_ratings(ratings.clone());
    }
    if let Some(predictions) = &cli.predictions {
        config = config.with_predictions(predictions.clone());
    }
    if let Some(translation) = &cli.translation {
        config = config.with_translation(translation.clone());
    }
    if let Some(size) = cli.catalog_size {
        config = config.with_catalog_size(size);
    }
    config
}

/// Where a source can be looked at in a browser, when that differs from where it is fetched
fn viewable(source: &DataSource) -> String {
    match source {
        DataSource::Url(url) if url == SHORT_RATINGS_URL => SHORT_RATINGS_VIEW_URL.to_string(),
        DataSource::Url(url) if url == SHORT_PREDICTIONS_URL => {
            SHORT_PREDICTIONS_VIEW_URL.to_string()
        }
        other => other.to_string(),
    }
}

fn print_welcome(config: &LoaderConfig) {
    println!("{}", "Welcome to mubi-recs!".bold().blue());
    println!(
        "This run loads two tables plus the translation file {}.",
        config.translation.display()
    );
    println!("If you wish, you can inspect the tables before starting:");
    println!("{}{}", "• ".green(), viewable(&config.ratings));
    println!("{}{}", "• ".green(), viewable(&config.predictions));

    if config.mode == DatasetMode::Long && !config.predictions.is_remote() {
        println!(
            "The predictions file for 1000 users can be downloaded from {}",
            LONG_PREDICTIONS_DOWNLOAD_URL
        );
    }
    if config.ratings.is_remote() || config.predictions.is_remote() {
        println!("{}", "Remote tables can take a moment to load.".dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mubi-recs", "mean"]).unwrap();
        assert_eq!(cli.mode, ModeArg::Short);
        assert_eq!(cli.user, UserSelector::Random);
        assert_eq!(cli.command.query(), Some(Query::Mean));

        let config = build_config(&cli);
        assert_eq!(config.mode, DatasetMode::Short);
        assert_eq!(config.fetch_timeout, Duration::from_secs(60));
        assert_eq!(config.ratings, DataSource::Url(SHORT_RATINGS_URL.to_string()));
        assert_eq!(viewable(&config.ratings), SHORT_RATINGS_VIEW_URL);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "mubi-recs",
            "--mode",
            "long",
            "--predictions",
            "data/recs.csv",
            "--catalog-size",
            "12",
            "--timeout-secs",
            "5",
            "--user",
            "43744268",
            "recommend",
            "--count",
            "7",
        ])
        .unwrap();

        assert_eq!(cli.user, UserSelector::Id(43744268));
        assert_eq!(cli.command.query(), Some(Query::Recommend(7)));

        let config = build_config(&cli);
        assert_eq!(config.mode, DatasetMode::Long);
        assert_eq!(config.predictions, DataSource::Path("data/recs.csv".into()));
        assert_eq!(config.catalog_size, 12);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_shell_has_no_single_query() {
        let cli = Cli::try_parse_from(["mubi-recs", "--quiet", "shell"]).unwrap();
        assert!(cli.quiet);
        assert!(cli.command.query().is_none());
    }

    #[test]
    fn test_bad_user_is_rejected() {
        assert!(Cli::try_parse_from(["mubi-recs", "--user", "someone", "mean"]).is_err());
    }
}
