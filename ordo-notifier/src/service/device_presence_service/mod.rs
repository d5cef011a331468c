mod device_heartbeat_task;
mod device_presence_service;
mod device_presence_service_impl;
mod device_presence_sweeper;
mod dto;

pub use device_heartbeat_task::*;
pub use device_presence_service::*;
pub use device_presence_service_impl::*;
pub use device_presence_sweeper::*;
pub use dto::{DevicePresenceServiceConfig, RegisteredDevice};
