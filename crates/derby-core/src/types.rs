//! Core type definitions for the derby race simulation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DerbyError, Result};

/// How many finishers the final report names.
pub const WINNER_COUNT: usize = 3;

/// Competitor identifier: the zero-based creation index.
///
/// Creation order doubles as the deterministic tie-break for finishers
/// observed in the same judge pass, so the `Ord` impl matters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CompetitorId(pub usize);

impl std::fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0 + 1)
    }
}

/// Immutable identity and parameters of a competitor, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorProfile {
    /// Creation-order identifier
    pub id: CompetitorId,
    /// Display name (`c1`, `c2`, ...)
    pub name: String,
    /// Distance gained per advance step
    pub velocity: u32,
    /// Subtracted from every rest draw; higher stamina means shorter rests
    pub stamina: u32,
}

impl CompetitorProfile {
    pub fn new(id: CompetitorId, velocity: u32, stamina: u32) -> Self {
        Self {
            id,
            name: id.to_string(),
            velocity,
            stamina,
        }
    }
}

/// Final outcome of a race.
///
/// `profiles` is indexed by `CompetitorId`; `finish_order` is the judge's
/// append-only record and, once the race returns, a permutation of all
/// competitor ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResult {
    pub profiles: Vec<CompetitorProfile>,
    pub finish_order: Vec<CompetitorId>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl RaceResult {
    /// Look up the profile for a competitor id.
    pub fn profile(&self, id: CompetitorId) -> Option<&CompetitorProfile> {
        self.profiles.get(id.0)
    }

    /// The first three finishers, in finish order.
    ///
    /// Fails with `InsufficientCompetitors` when fewer than three competitors
    /// raced; the boundary is surfaced here, at the reporting step, rather
    /// than during setup.
    pub fn winners(&self) -> Result<Vec<&CompetitorProfile>> {
        if self.finish_order.len() < WINNER_COUNT {
            return Err(DerbyError::InsufficientCompetitors {
                required: WINNER_COUNT,
                actual: self.finish_order.len(),
            });
        }
        self.finish_order[..WINNER_COUNT]
            .iter()
            .map(|id| {
                self.profile(*id).ok_or_else(|| {
                    DerbyError::RaceAborted(format!("finish order names unknown competitor {id}"))
                })
            })
            .collect()
    }
}
