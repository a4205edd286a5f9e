use std::time::Duration;

use common::badge::BadgeKind;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::ServiceError;
use crate::api::v0::notifications::{UnreadMessagesRequest, UnreadNotificationsRequest};
use crate::api::ApiError;
use crate::Pulse;

/// Badge counters and their reconciliation with the server
pub struct NotificationService<'a> {
    pulse: &'a Pulse,
}

impl<'a> NotificationService<'a> {
    pub(crate) fn new(pulse: &'a Pulse) -> Self {
        Self { pulse }
    }

    /// Reconcile both counters concurrently. Each one that fails keeps its
    /// previous value; the first error is returned.
    pub async fn refresh_badges(&self) -> Result<(u64, u64), ServiceError> {
        let (notifications, messages) = tokio::join!(
            self.reconcile(BadgeKind::Notifications),
            self.reconcile(BadgeKind::Messages),
        );
        Ok((notifications?, messages?))
    }

    pub async fn reconcile(&self, kind: BadgeKind) -> Result<u64, ServiceError> {
        let client = self.pulse.client();
        let fetch = async {
            let response = match kind {
                BadgeKind::Notifications => client.call(UnreadNotificationsRequest {}).await,
                BadgeKind::Messages => client.call(UnreadMessagesRequest {}).await,
            }?;
            Ok::<_, ApiError>(response.count)
        };
        Ok(self.pulse.badges().reconcile(kind, fetch).await?)
    }

    /// Count an event that arrived outside a fetch (e.g. a push). The
    /// counter is stale until the next reconcile.
    pub fn record_incoming(&self, kind: BadgeKind) -> u64 {
        self.pulse.badges().increment(kind, 1)
    }

    /// Reset a counter locally after the user has looked at everything
    pub fn clear(&self, kind: BadgeKind) {
        self.pulse.badges().set(kind, 0);
    }
}

/// Reconcile badges every `period` until `shutdown` fires or its sender
/// is dropped
pub async fn run_reconciler(pulse: Pulse, period: Duration, mut shutdown: watch::Receiver<()>) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = pulse.notifications().refresh_badges().await {
                    tracing::debug!(error = %e, "periodic badge refresh failed");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    tracing::debug!("reconciler shutdown channel closed");
                }
                break;
            }
        }
    }
    tracing::debug!("badge reconciler stopped");
}
