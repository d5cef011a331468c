use std::time::Duration;

#[derive(Clone)]
pub struct DevicePresenceServiceConfig {
    /// A device without a heartbeat for this long is considered offline
    pub offline_timeout: Duration,
    pub sweep_interval: Duration,
    pub heartbeat_interval: Duration,

    /// Informational only, best effort
    pub ip_address: Option<String>,
    pub hostname: Option<String>,
}
