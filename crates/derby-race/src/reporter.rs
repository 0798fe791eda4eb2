//! Live status reporting
//!
//! The reporter reads competitor positions on a fixed tick and rewrites a
//! single status line. It takes no locks and touches no race state beyond
//! atomic position reads, so it never delays competitors or the judge.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::competitor::Competitor;

/// Background status-line printer with cooperative shutdown.
pub struct Reporter {
    competitors: Vec<Arc<Competitor>>,
    interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Reporter {
    pub fn new(
        competitors: Vec<Arc<Competitor>>,
        interval: Duration,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            competitors,
            interval,
            shutdown_rx,
        }
    }

    /// Print an overwritten status line on every tick until shutdown is
    /// signaled (or every sender is dropped).
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    print!("{}\r", render_status_line(&self.competitors));
                    let _ = std::io::stdout().flush();
                }
                _ = self.shutdown_rx.recv() => {
                    debug!("reporter shutting down");
                    break;
                }
            }
        }
    }
}

/// One `name: position` segment per competitor, creation order.
pub fn render_status_line(competitors: &[Arc<Competitor>]) -> String {
    let mut line = String::new();
    for competitor in competitors {
        line.push_str(&format!("{}: {} | ", competitor.name(), competitor.position()));
    }
    line
}
