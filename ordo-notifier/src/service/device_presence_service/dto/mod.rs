mod device_presence_service_config;
mod registered_device;

pub use device_presence_service_config::*;
pub use registered_device::*;
