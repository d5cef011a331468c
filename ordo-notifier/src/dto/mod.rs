//!
//! Value types shared by the services and the wire payload
//! exchanged between department clients
//!

mod device_status;
mod module_type;
mod notification_message;
mod notification_priority;
mod notification_type;
mod user_context;

pub use device_status::*;
pub use module_type::*;
pub use notification_message::*;
pub use notification_priority::*;
pub use notification_type::*;
pub use user_context::*;
