//! Text and JSON rendering of recommendations

use std::fmt::Write as _;
use tunerank_core::{Error, Result};
use tunerank_similarity::{Recommendations, Vibe};

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidConfig(format!("unknown output format '{}'", other))),
        }
    }
}

/// Layout of the text report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// One ranked table for a listening profile
    Profile,
    /// One section per query playlist
    Playlists,
}

const UNKNOWN: &str = "Unknown";

/// Renders recommendation lists
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    format: OutputFormat,
    style: ReportStyle,
}

impl Reporter {
    pub fn new(format: OutputFormat, style: ReportStyle) -> Self {
        Self { format, style }
    }

    pub fn render(&self, results: &[Recommendations]) -> Result<String> {
        match self.format {
            OutputFormat::Json => render_json(results),
            OutputFormat::Text => Ok(match self.style {
                ReportStyle::Profile => results.iter().map(render_profile).collect(),
                ReportStyle::Playlists => render_playlists(results),
            }),
        }
    }
}

/// Pretty JSON array, one object per query
pub fn render_json(results: &[Recommendations]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(results)?;
    out.push('\n');
    Ok(out)
}

/// Ranked table of a profile query
pub fn render_profile(recs: &Recommendations) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Discovery Recommendations ===");
    let _ = writeln!(
        out,
        "Based on a listening profile of {} tracks ({})",
        recs.query.tracks,
        vibe_line(&recs.query.vibe)
    );
    let _ = writeln!(out, "Scanning {} candidates...", recs.stats.pool_size);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<5} | {:<6} | {:<15} | {:<40} | {}",
        "Rank", "Score", "Genre", "Title", "Artist"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));

    for entry in &recs.entries {
        let genre = truncate(entry.genre.as_deref().unwrap_or(UNKNOWN), 15);
        let title = truncate(entry.title.as_deref().unwrap_or(UNKNOWN), 38);
        let artist = truncate(entry.artist.as_deref().unwrap_or(UNKNOWN), 25);
        let _ = writeln!(
            out,
            "{:<5} | {:.4} | {:<15} | {:<40} | {}",
            entry.rank, entry.score, genre, title, artist
        );
    }
    if recs.entries.is_empty() {
        let _ = writeln!(out, "No recommendations.");
    }
    out
}

/// One section per query playlist
pub fn render_playlists(results: &[Recommendations]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Found {} query playlists. Generating recommendations...",
        results.len()
    );

    for recs in results {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Recommendations for playlist: '{}'",
            recs.query.title.as_deref().unwrap_or(UNKNOWN)
        );
        let _ = writeln!(out, "{}", "-".repeat(50));
        let _ = writeln!(out, "   [Query Vibe] {}", vibe_line(&recs.query.vibe));

        for entry in &recs.entries {
            let _ = writeln!(
                out,
                "Rank {}: '{}' (Score: {:.4})",
                entry.rank,
                entry.title.as_deref().unwrap_or(UNKNOWN),
                entry.score
            );
            let _ = writeln!(out, "   [Vibe] {}", vibe_line(&entry.vibe));
            if !entry.top_tracks.is_empty() {
                let _ = writeln!(out, "   Top Tracks: {}...", entry.top_tracks.join(", "));
            }
        }
        if recs.entries.is_empty() {
            let _ = writeln!(out, "No recommendations.");
        }
    }
    out
}

fn vibe_line(vibe: &Vibe) -> String {
    format!(
        "Tempo: {:.1}, Energy: {:.2}, Valence: {:.2}",
        vibe.tempo, vibe.energy, vibe.valence
    )
}

/// First `max` characters of `s`
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
