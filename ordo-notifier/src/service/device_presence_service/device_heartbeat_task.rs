use super::{DevicePresenceService, DevicePresenceServiceConfig};
use std::sync::Arc;
use tokio::{
    sync::Notify,
    time::{interval, Interval, MissedTickBehavior},
};

///
/// Periodic task keeping this client's presence fresh while the
/// process is running. Ticks before the first registration are the
/// documented unknown-device no-op.
///
pub struct DeviceHeartbeatTask {
    presence_service: Arc<dyn DevicePresenceService>,

    interval: Interval,
}

impl DeviceHeartbeatTask {
    pub fn new(
        config: &DevicePresenceServiceConfig,
        presence_service: Arc<dyn DevicePresenceService>,
    ) -> Self {
        let mut interval = interval(config.heartbeat_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            presence_service,
            interval,
        }
    }

    #[tracing::instrument(name = "Device Heartbeat", skip_all)]
    pub async fn run(mut self, close_notify: Arc<Notify>) {
        tokio::select! {
            biased;

            // Wait for signal to close
            _ = close_notify.notified() => {},

            // Pump heartbeats periodically
            _ = async { loop {
                self.interval.tick().await;
                self.presence_service.heartbeat().await;
            }} => {}
        }
    }
}
