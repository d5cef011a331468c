use super::{dto::DeviceRegistration, error::Error};
use crate::dto::{DeviceStatus, ModuleType};
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DevicesRepository: Send + Sync {
    ///
    /// Creates or overwrites the record of the device, keyed by
    /// device_id
    ///
    async fn upsert_registration(&self, registration: DeviceRegistration) -> Result<(), Error>;

    ///
    /// Finds the record of one device
    ///
    async fn find_by_device_id(
        &self,
        device_id: Uuid,
    ) -> Result<Option<DeviceRegistration>, Error>;

    ///
    /// Finds the user's record with the most recent heartbeat across
    /// all devices the user ever registered
    ///
    async fn find_latest_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DeviceRegistration>, Error>;

    ///
    /// Refreshes last_heartbeat and forces status ONLINE
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when the device is not registered
    ///
    async fn update_heartbeat(&self, device_id: Uuid, at: OffsetDateTime) -> Result<(), Error>;

    ///
    /// Sets the device status
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when the device is not registered
    ///
    async fn update_status(&self, device_id: Uuid, status: DeviceStatus) -> Result<(), Error>;

    ///
    /// Flips every ONLINE device whose last_heartbeat is older than
    /// the timestamp to OFFLINE. Row-level and idempotent, safe to run
    /// concurrently with registrations and heartbeats of other devices.
    ///
    /// ### Returns
    /// Number of devices flipped
    ///
    async fn update_many_stale_offline(&self, older_than: OffsetDateTime) -> Result<u64, Error>;

    ///
    /// Finds every ONLINE device, optionally filtered by module
    ///
    async fn find_many_online(
        &self,
        module: Option<ModuleType>,
    ) -> Result<Vec<DeviceRegistration>, Error>;
}
