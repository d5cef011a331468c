use crate::dto::{DeviceStatus, ModuleType};
use time::OffsetDateTime;
use uuid::Uuid;

///
/// Presence record of one client process instance.
///
/// Keyed by `device_id` and overwritten in place on every
/// registration from that device; `last_heartbeat` doubles as the
/// per-user "last seen" catch-up checkpoint (the registry looks it up
/// across all of a user's devices, not just this one).
///
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRegistration {
    pub device_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub module: ModuleType,
    pub status: DeviceStatus,
    pub last_heartbeat: OffsetDateTime,
    pub registered_at: OffsetDateTime,
    pub ip_address: Option<String>,
    pub hostname: Option<String>,
}
