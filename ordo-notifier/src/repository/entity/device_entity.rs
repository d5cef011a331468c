use crate::{
    dto::{DeviceStatus, ModuleType},
    repository::DeviceRegistration,
};
use bson::{DateTime, Uuid};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct DeviceEntity {
    pub device_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub module: ModuleType,
    pub status: DeviceStatus,
    pub last_heartbeat: DateTime,
    pub registered_at: DateTime,
    pub ip_address: Option<String>,
    pub hostname: Option<String>,
}

impl From<&DeviceRegistration> for DeviceEntity {
    fn from(registration: &DeviceRegistration) -> Self {
        Self {
            device_id: registration.device_id.into(),
            user_id: registration.user_id.into(),
            username: registration.username.clone(),
            module: registration.module,
            status: registration.status,
            last_heartbeat: DateTime::from(registration.last_heartbeat),
            registered_at: DateTime::from(registration.registered_at),
            ip_address: registration.ip_address.clone(),
            hostname: registration.hostname.clone(),
        }
    }
}

impl From<DeviceEntity> for DeviceRegistration {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            device_id: entity.device_id.into(),
            user_id: entity.user_id.into(),
            username: entity.username,
            module: entity.module,
            status: entity.status,
            last_heartbeat: entity.last_heartbeat.to_time_0_3(),
            registered_at: entity.registered_at.to_time_0_3(),
            ip_address: entity.ip_address,
            hostname: entity.hostname,
        }
    }
}
