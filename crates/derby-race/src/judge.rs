//! Finish-order judging
//!
//! The judge is event-driven: competitors send a finish event the moment they
//! cross the line, and the judge blocks on the channel instead of polling
//! positions. One blocking receive plus a drain of everything already queued
//! forms one observation pass; events in the same pass are recorded in
//! creation order, since sub-pass arrival timing is not a meaningful signal.

use derby_core::{CompetitorId, DerbyError, Result};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Sole writer of the finish order.
///
/// Consumes finish events until every expected competitor is recorded, then
/// returns the completed order. Readers obtain the order by awaiting the
/// judge's task handle, which gives them the happens-before edge they need.
pub struct Judge {
    expected: usize,
    finish_rx: mpsc::UnboundedReceiver<CompetitorId>,
    order: Vec<CompetitorId>,
    recorded: Vec<bool>,
}

impl Judge {
    pub fn new(expected: usize, finish_rx: mpsc::UnboundedReceiver<CompetitorId>) -> Self {
        Self {
            expected,
            finish_rx,
            order: Vec::with_capacity(expected),
            recorded: vec![false; expected],
        }
    }

    /// Run until the finish order is complete.
    ///
    /// An empty competitor set completes immediately with an empty order. A
    /// channel that closes before the order is complete means a competitor
    /// task died, which aborts the race rather than returning a truncated
    /// order.
    pub async fn run(mut self) -> Result<Vec<CompetitorId>> {
        while self.order.len() < self.expected {
            let Some(first) = self.finish_rx.recv().await else {
                return Err(DerbyError::RaceAborted(format!(
                    "finish channel closed with {} of {} competitors recorded",
                    self.order.len(),
                    self.expected
                )));
            };

            // everything already queued belongs to the same pass
            let mut pass = vec![first];
            while let Ok(id) = self.finish_rx.try_recv() {
                pass.push(id);
            }
            pass.sort_unstable();

            for id in pass {
                self.record(id);
            }
        }

        debug!(finishers = self.order.len(), "finish order complete");
        Ok(self.order)
    }

    fn record(&mut self, id: CompetitorId) {
        match self.recorded.get_mut(id.0) {
            Some(seen) if !*seen => {
                *seen = true;
                self.order.push(id);
            }
            // a duplicate event for a recorded finisher is a no-op
            Some(_) => {}
            None => warn!(%id, "finish event for unknown competitor ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(indices: &[usize]) -> Vec<CompetitorId> {
        indices.iter().map(|i| CompetitorId(*i)).collect()
    }

    #[tokio::test]
    async fn empty_field_completes_immediately() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let order = Judge::new(0, rx).run().await.unwrap();
        assert!(order.is_empty());
    }

    #[tokio::test]
    async fn same_pass_ties_break_by_creation_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        // both queued before the judge's first receive: one pass
        tx.send(CompetitorId(2)).unwrap();
        tx.send(CompetitorId(0)).unwrap();

        let judge = tokio::spawn(Judge::new(3, rx).run());
        // let the judge drain the first pass before the last finisher arrives
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        tx.send(CompetitorId(1)).unwrap();

        let order = judge.await.unwrap().unwrap();
        assert_eq!(&order[..2], &ids(&[0, 2])[..]);
        assert_eq!(order.len(), 3);
    }

    #[tokio::test]
    async fn separate_passes_keep_arrival_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let judge = tokio::spawn(Judge::new(3, rx).run());

        for id in [2, 0, 1] {
            tx.send(CompetitorId(id)).unwrap();
            // let the judge drain this event before the next arrives
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
        }

        let order = judge.await.unwrap().unwrap();
        assert_eq!(order, ids(&[2, 0, 1]));
    }

    #[tokio::test]
    async fn duplicate_events_are_recorded_once() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(CompetitorId(0)).unwrap();
        tx.send(CompetitorId(0)).unwrap();
        tx.send(CompetitorId(1)).unwrap();

        let order = Judge::new(2, rx).run().await.unwrap();
        assert_eq!(order, ids(&[0, 1]));
    }

    #[tokio::test]
    async fn early_channel_close_aborts() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(CompetitorId(0)).unwrap();
        drop(tx);

        let err = Judge::new(2, rx).run().await.unwrap_err();
        assert!(matches!(err, DerbyError::RaceAborted(_)));
    }
}
