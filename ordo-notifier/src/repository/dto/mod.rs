mod device_registration;
mod notification_record;

pub use device_registration::*;
pub use notification_record::*;
