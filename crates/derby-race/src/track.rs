//! Track state and bonus-zone arbitration
//!
//! The bonus effect is guarded by a one-permit semaphore. Tokio's semaphore
//! queues waiters in FIFO order, so contending competitors are granted the
//! bonus in arrival order and none can be starved. The permit is released on
//! drop, including when the holder's future is torn down mid-hold.

use std::time::Duration;

use derby_core::{DerbyError, RaceConfig, Result};
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::competitor::Competitor;

/// Bonus zone bounds.
///
/// A position counts as inside only strictly between the bounds; standing on
/// either bound earns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusZone {
    lower: u64,
    upper: u64,
}

impl BonusZone {
    pub fn new(lower: u64, upper: u64) -> Self {
        Self { lower, upper }
    }

    pub fn lower(&self) -> u64 {
        self.lower
    }

    pub fn upper(&self) -> u64 {
        self.upper
    }

    pub fn contains(&self, position: u64) -> bool {
        position > self.lower && position < self.upper
    }
}

/// Shared race environment: total distance, the bonus zone, and the
/// single-holder fair lock gating the bonus effect.
pub struct Track {
    total_distance: u64,
    zone: BonusZone,
    bonus_distance: u64,
    bonus_hold: Duration,
    bonus_permit: Semaphore,
}

impl Track {
    /// Create a track with a randomly placed bonus zone.
    ///
    /// The lower bound is drawn uniformly from
    /// `[0, total_distance - bonus_zone_width]`.
    pub fn new(config: &RaceConfig, rng: &mut StdRng) -> Self {
        let lower = rng.random_range(0..=config.total_distance - config.bonus_zone_width);
        Self::with_zone(config, BonusZone::new(lower, lower + config.bonus_zone_width))
    }

    /// Create a track with explicit zone bounds.
    pub fn with_zone(config: &RaceConfig, zone: BonusZone) -> Self {
        Self {
            total_distance: config.total_distance,
            zone,
            bonus_distance: config.bonus_distance,
            bonus_hold: config.bonus_hold(),
            bonus_permit: Semaphore::new(1),
        }
    }

    pub fn total_distance(&self) -> u64 {
        self.total_distance
    }

    pub fn bonus_zone(&self) -> BonusZone {
        self.zone
    }

    /// Apply the bonus to `competitor` if it stands strictly inside the zone.
    ///
    /// Blocks until the single bonus permit is granted (FIFO among waiters),
    /// holds it for the configured duration, advances the competitor by the
    /// bonus distance, and releases the permit. Outside the zone this is a
    /// no-op. Returns whether the bonus was applied.
    ///
    /// The zone is not consumed: every competitor inside it at check time is
    /// eligible, on every check.
    pub async fn try_apply_bonus(&self, competitor: &Competitor) -> Result<bool> {
        if !self.zone.contains(competitor.position()) {
            return Ok(false);
        }

        let _permit = self
            .bonus_permit
            .acquire()
            .await
            .map_err(|_| DerbyError::RaceAborted("bonus permit semaphore closed".to_string()))?;

        tokio::time::sleep(self.bonus_hold).await;
        competitor.advance_by(self.bonus_distance);
        debug!(
            competitor = competitor.name(),
            position = competitor.position(),
            "bonus applied"
        );

        Ok(true)
    }
}
