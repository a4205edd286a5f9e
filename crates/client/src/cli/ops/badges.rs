use std::fmt;
use std::time::Duration;

use clap::Args;
use owo_colors::OwoColorize;
use tokio::sync::{broadcast, watch};

use common::badge::{BadgeCounter, BadgeKind, SyncState};
use common::bus::AppEvent;
use pulse_client::services::run_reconciler;

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Badges {
    /// Keep reconciling in the background and print every change until
    /// interrupted
    #[arg(long)]
    pub watch: bool,

    /// Refresh period for --watch in seconds (default: badge_refresh_secs)
    #[arg(long, requires = "watch")]
    pub every: Option<u64>,
}

#[derive(Debug)]
pub struct BadgesOutput {
    pub counters: Vec<(BadgeKind, BadgeCounter)>,
}

impl fmt::Display for BadgesOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, counter)) in self.counters.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let state = match counter.state() {
                SyncState::Synced => "synced".green().to_string(),
                SyncState::Stale => "stale".yellow().to_string(),
                SyncState::Uninitialized => "unknown".red().to_string(),
            };
            write!(
                f,
                "{:<14} {:>4}  {}",
                format!("{kind}:").dimmed(),
                counter.value().bold(),
                state
            )?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Badges {
    type Error = ClientOpError;
    type Output = BadgesOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let pulse = ctx.pulse()?;

        if self.watch {
            let period = self
                .every
                .map(Duration::from_secs)
                .unwrap_or_else(|| state.config.badge_refresh());
            let mut events = pulse.bus().stream();
            let (shutdown_tx, shutdown_rx) = watch::channel(());
            let reconciler = tokio::spawn(run_reconciler(pulse.clone(), period, shutdown_rx));

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = events.recv() => match event {
                        Ok(AppEvent::BadgeSet { kind, count }) => {
                            println!("{} {kind}: {count}", "●".green());
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "badge watcher lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }

            let _ = shutdown_tx.send(());
            if let Err(e) = reconciler.await {
                tracing::warn!(error = %e, "badge reconciler task failed");
            }
        } else {
            pulse.notifications().refresh_badges().await?;
        }

        let badges = pulse.badges();
        Ok(BadgesOutput {
            counters: BadgeKind::ALL
                .iter()
                .map(|kind| (*kind, badges.counter(*kind)))
                .collect(),
        })
    }
}
