//! derby CLI - concurrent race simulation
//!
//! Prompts for a competitor count on stdin, announces the field and the
//! track, runs the race with a live status line, and names the top three
//! finishers.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use derby_core::{DerbyError, RaceConfig};
use derby_race::Race;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "derby")]
#[command(version, about = "Concurrent race simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Master seed for a reproducible race
    #[arg(long)]
    seed: Option<u64>,

    /// Race configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = RaceConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load race configuration")?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let count = prompt_competitor_count().context("Failed to read competitor count")?;

    let race = Race::new(count, config)?;
    announce_field(&race);

    let result = race.run().await?;

    // move past the overwritten status line
    println!();
    println!("Race winners:");
    for (place, profile) in result.winners()?.iter().enumerate() {
        println!("{}. {}", place + 1, profile.name);
    }

    Ok(())
}

/// Read the competitor count from stdin. Invalid input is fatal.
fn prompt_competitor_count() -> derby_core::Result<usize> {
    println!("Enter the number of competitors:");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    parse_competitor_count(&line)
}

fn parse_competitor_count(input: &str) -> derby_core::Result<usize> {
    let trimmed = input.trim();
    let count: usize = trimmed
        .parse()
        .map_err(|_| DerbyError::InvalidCompetitorCount(trimmed.to_string()))?;
    if count == 0 {
        return Err(DerbyError::InvalidCompetitorCount(trimmed.to_string()));
    }
    Ok(count)
}

fn announce_field(race: &Race) {
    for competitor in race.competitors() {
        let profile = competitor.profile();
        println!(
            "{}: velocity {}, stamina {}",
            profile.name, profile.velocity, profile.stamina
        );
    }
    let track = race.track();
    let zone = track.bonus_zone();
    println!(
        "Total distance: {}, bonus zone between {} and {}",
        track.total_distance(),
        zone.lower(),
        zone.upper()
    );
}
