use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use tunerank::loader::{load_config, load_items, load_tracks};
use tunerank::{
    OutputFormat, Preset, Recommender, RecommenderConfig, ReportStyle, Reporter, ScalerKind,
    SignalMode,
};

/// Content-based music recommendations from audio features and track text
#[derive(Parser, Debug)]
#[command(name = "tunerank")]
#[command(about = "Content-based music recommendation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend unknown tracks for a listening history
    Profile {
        /// Listening history (JSON)
        #[arg(long)]
        history: PathBuf,

        /// Candidate pool (JSON)
        #[arg(long)]
        pool: PathBuf,

        #[command(flatten)]
        options: Options,
    },
    /// Recommend playlists for every query playlist of a collection
    Playlists {
        /// Playlist collection (JSON)
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        options: Options,
    },
}

#[derive(Args, Debug)]
struct Options {
    /// Recommender configuration (JSON)
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// discovery, playlist-text, playlist-hybrid or playlist-features
    #[arg(long)]
    preset: Option<Preset>,

    /// Number of recommendations per query
    #[arg(long)]
    top_k: Option<usize>,

    /// Text weight of the hybrid blend
    #[arg(long)]
    alpha: Option<f32>,

    /// min-max or standard
    #[arg(long)]
    scaler: Option<ScalerKind>,

    /// text, features or hybrid
    #[arg(long)]
    signals: Option<SignalMode>,

    /// text or json
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Options {
    fn resolve(&self, fallback: Preset) -> anyhow::Result<RecommenderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => self.preset.unwrap_or(fallback).config(),
        };
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(scaler) = self.scaler {
            config.scaler = scaler;
        }
        if let Some(signals) = self.signals {
            config.signals = signals;
        }
        Ok(config)
    }

    fn emit(&self, report: &str) -> anyhow::Result<()> {
        match &self.output {
            Some(path) => {
                std::fs::write(path, report)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("Results saved to {}", path.display());
            }
            None => print!("{}", report),
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tunerank v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Profile {
            history,
            pool,
            options,
        } => {
            let recommender = Recommender::new(options.resolve(Preset::Discovery)?)?;

            info!("Loading listening history from {}", history.display());
            let history = load_tracks(history)
                .with_context(|| format!("failed to load {}", history.display()))?;
            info!("Loading candidate pool from {}", pool.display());
            let items = load_items(pool)
                .with_context(|| format!("failed to load {}", pool.display()))?;

            let fitted = recommender.fit(items)?;
            let recs = recommender.recommend_for_profile(&fitted, &history)?;

            let report = Reporter::new(options.format, ReportStyle::Profile).render(&[recs])?;
            options.emit(&report)?;
        }
        Command::Playlists { input, options } => {
            let recommender = Recommender::new(options.resolve(Preset::PlaylistHybrid)?)?;

            info!("Loading playlists from {}", input.display());
            let items = load_items(input)
                .with_context(|| format!("failed to load {}", input.display()))?;

            let fitted = recommender.fit(items)?;
            let all = recommender.recommend_all(&fitted)?;

            let report = Reporter::new(options.format, ReportStyle::Playlists).render(&all)?;
            options.emit(&report)?;
        }
    }

    Ok(())
}
