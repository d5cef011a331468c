use super::{DevicePresenceService, DevicePresenceServiceConfig};
use std::sync::Arc;
use tokio::{
    sync::Notify,
    time::{interval, Interval, MissedTickBehavior},
};

///
/// Periodic task flipping devices without a recent heartbeat to
/// OFFLINE. Runs decoupled from any request/response cycle.
///
pub struct DevicePresenceSweeper {
    presence_service: Arc<dyn DevicePresenceService>,

    interval: Interval,
}

impl DevicePresenceSweeper {
    pub fn new(
        config: &DevicePresenceServiceConfig,
        presence_service: Arc<dyn DevicePresenceService>,
    ) -> Self {
        let mut interval = interval(config.sweep_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            presence_service,
            interval,
        }
    }

    #[tracing::instrument(name = "Presence Sweeper", skip_all)]
    pub async fn run(mut self, close_notify: Arc<Notify>) {
        tokio::select! {
            biased;

            // Wait for signal to close
            _ = close_notify.notified() => {},

            // Sweep stale devices periodically
            _ = async { loop {
                self.interval.tick().await;
                self.presence_service.sweep_stale().await;
            }} => {}
        }
    }
}
