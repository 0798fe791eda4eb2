//! Race orchestration
//!
//! Builds the shared track and the competitor set, runs every component
//! concurrently, and blocks only on the judge. Competitor tasks own their
//! RNGs and positions; the orchestrator holds the only handles that join
//! them.

use std::sync::Arc;

use chrono::Utc;
use derby_core::{CompetitorId, CompetitorProfile, DerbyError, RaceConfig, RaceResult, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::info;

use crate::competitor::{self, Competitor, Pace};
use crate::judge::Judge;
use crate::reporter::Reporter;
use crate::track::Track;

/// A fully constructed race, ready to run.
///
/// Construction is where all randomness is drawn: the zone placement from the
/// master RNG and each competitor's velocity/stamina from its own RNG. With a
/// master seed, competitor `i` seeds from `seed.wrapping_add(i + 1)`, so each
/// competitor's behavior is independently reproducible.
pub struct Race {
    config: RaceConfig,
    track: Arc<Track>,
    competitors: Vec<Arc<Competitor>>,
    rngs: Vec<StdRng>,
}

impl Race {
    /// Build the track and a field of `count` competitors.
    pub fn new(count: usize, config: RaceConfig) -> Result<Self> {
        config.validate()?;

        let mut master_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let track = Arc::new(Track::new(&config, &mut master_rng));

        let mut competitors = Vec::with_capacity(count);
        let mut rngs = Vec::with_capacity(count);
        for i in 0..count {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64 + 1)),
                None => StdRng::from_os_rng(),
            };
            let velocity = rng.random_range(1..=config.param_max);
            let stamina = rng.random_range(1..=config.param_max);
            let profile = CompetitorProfile::new(CompetitorId(i), velocity, stamina);
            competitors.push(Arc::new(Competitor::new(profile)));
            rngs.push(rng);
        }

        Ok(Self {
            config,
            track,
            competitors,
            rngs,
        })
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn competitors(&self) -> &[Arc<Competitor>] {
        &self.competitors
    }

    /// Run the race to completion and return the finish order.
    ///
    /// Spawns one task per competitor plus the judge and (when enabled) the
    /// reporter, then awaits the competitor handles and finally the judge.
    /// A failed competitor or judge task aborts the whole race.
    pub async fn run(mut self) -> Result<RaceResult> {
        let started_at = Utc::now();
        info!(competitors = self.competitors.len(), "race starting");

        let (finish_tx, finish_rx) = mpsc::unbounded_channel();
        let pace = Pace {
            time_unit: self.config.time_unit(),
            rest_draw_max: self.config.rest_draw_max,
        };

        let mut handles = Vec::with_capacity(self.competitors.len());
        for (competitor, rng) in self.competitors.iter().zip(self.rngs.drain(..)) {
            handles.push(tokio::spawn(competitor::run(
                Arc::clone(competitor),
                Arc::clone(&self.track),
                rng,
                pace,
                finish_tx.clone(),
            )));
        }
        drop(finish_tx);

        let judge = tokio::spawn(Judge::new(self.competitors.len(), finish_rx).run());

        let reporter = if self.config.live_status {
            let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
            let handle = tokio::spawn(
                Reporter::new(
                    self.competitors.clone(),
                    self.config.status_interval(),
                    shutdown_rx,
                )
                .run(),
            );
            Some((shutdown_tx, handle))
        } else {
            None
        };

        for handle in handles {
            handle
                .await
                .map_err(|e| DerbyError::RaceAborted(format!("competitor task failed: {e}")))??;
        }
        let finish_order = judge
            .await
            .map_err(|e| DerbyError::RaceAborted(format!("judge task failed: {e}")))??;

        if let Some((shutdown_tx, handle)) = reporter {
            let _ = shutdown_tx.send(()).await;
            let _ = handle.await;
        }

        let ended_at = Utc::now();
        info!("race finished");

        Ok(RaceResult {
            profiles: self
                .competitors
                .iter()
                .map(|c| c.profile().clone())
                .collect(),
            finish_order,
            started_at,
            ended_at,
        })
    }
}
