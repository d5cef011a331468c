mod device_entity;
mod notification_entity;

pub use device_entity::*;
pub use notification_entity::*;
