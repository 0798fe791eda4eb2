//! Competitor state and task loop

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use derby_core::{CompetitorId, CompetitorProfile, DerbyError, Result};
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::mpsc;
use tracing::debug;

use crate::track::Track;

/// Pacing parameters shared by every competitor task.
#[derive(Debug, Clone, Copy)]
pub struct Pace {
    /// Wall-clock duration of one simulated time unit
    pub time_unit: Duration,
    /// Rest draws are uniform in 1..=rest_draw_max
    pub rest_draw_max: u32,
}

/// A competitor's racing state: immutable profile plus its position.
///
/// The position is written only by the owning task and read concurrently by
/// the judge and reporter. A single atomic carries it; readers get a non-torn,
/// monotonically non-decreasing value without any locking.
pub struct Competitor {
    profile: CompetitorProfile,
    position: AtomicU64,
}

impl Competitor {
    pub fn new(profile: CompetitorProfile) -> Self {
        Self {
            profile,
            position: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> CompetitorId {
        self.profile.id
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn profile(&self) -> &CompetitorProfile {
        &self.profile
    }

    /// Advance by this competitor's velocity.
    pub fn advance(&self) {
        self.advance_by(u64::from(self.profile.velocity));
    }

    /// Advance by an explicit distance (bonus application).
    pub fn advance_by(&self, distance: u64) {
        self.position.fetch_add(distance, Ordering::Relaxed);
    }

    /// Current position; safe for concurrent readers.
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    pub fn has_finished(&self, total_distance: u64) -> bool {
        self.position() >= total_distance
    }
}

/// Drive one competitor to the finish line.
///
/// Each iteration advances by velocity, offers the track a bonus claim, and
/// rests for `max(draw(1..=rest_draw_max) - stamina, 0)` time units. The rest
/// draw comes from the competitor's own RNG, owned by value here, so no
/// generator is ever shared across tasks.
///
/// Exactly one finish event is sent, at the moment the competitor first
/// observes its position at or past the total distance and before any
/// further rest, so the judge records crossings in the order they became
/// observable.
pub async fn run(
    competitor: Arc<Competitor>,
    track: Arc<Track>,
    mut rng: StdRng,
    pace: Pace,
    finish_tx: mpsc::UnboundedSender<CompetitorId>,
) -> Result<()> {
    let total_distance = track.total_distance();
    let stamina = competitor.profile().stamina;

    loop {
        competitor.advance();
        if competitor.has_finished(total_distance) {
            break;
        }

        track.try_apply_bonus(&competitor).await?;
        if competitor.has_finished(total_distance) {
            break;
        }

        let draw = rng.random_range(1..=pace.rest_draw_max);
        let rest_units = draw.saturating_sub(stamina);
        if rest_units > 0 {
            tokio::time::sleep(pace.time_unit * rest_units).await;
        }
    }

    debug!(
        competitor = competitor.name(),
        position = competitor.position(),
        "crossed the finish line"
    );
    finish_tx.send(competitor.id()).map_err(|_| {
        DerbyError::RaceAborted(format!(
            "{} finished but the judge is no longer listening",
            competitor.name()
        ))
    })?;

    Ok(())
}
