use super::RegisteredDevice;
use crate::{
    dto::{ModuleType, UserContext},
    error::Error,
    repository::DeviceRegistration,
};
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DevicePresenceService: Send + Sync {
    ///
    /// Identifier of this client process. Generated once per process
    /// and reused for its whole lifetime.
    ///
    fn device_id(&self) -> Uuid;

    ///
    /// Register this device for the user. Idempotent per device.
    ///
    /// The user's most recent previous session timestamp is looked up
    /// across all devices *before* this registration overwrites the
    /// device's own record, and returned in
    /// [RegisteredDevice::previous_last_seen]. `None` means first
    /// login ever; the caller must not issue a catch-up query then.
    ///
    async fn register(
        &self,
        user: UserContext,
        module: ModuleType,
    ) -> Result<RegisteredDevice, Error>;

    ///
    /// Refresh this device's heartbeat and force status ONLINE.
    ///
    /// Best effort: unknown device and persistence errors are logged
    /// and swallowed, presence tracking never aborts the caller.
    ///
    async fn heartbeat(&self);

    ///
    /// Explicit logout path, flips this device OFFLINE immediately
    /// without waiting for the sweep. Best effort.
    ///
    async fn set_offline(&self);

    ///
    /// Flip every device without a recent heartbeat to OFFLINE.
    /// Idempotent, safe to run concurrently with registrations and
    /// heartbeats of other devices. Best effort.
    ///
    async fn sweep_stale(&self);

    ///
    /// Read-only presence query, optionally filtered by department
    ///
    async fn online_devices(
        &self,
        module: Option<ModuleType>,
    ) -> Result<Vec<DeviceRegistration>, Error>;
}
