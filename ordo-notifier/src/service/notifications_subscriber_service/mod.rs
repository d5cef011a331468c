mod notification_listener;
mod notifications_subscriber_service;
mod notifications_subscriber_service_impl;

pub use notification_listener::*;
pub use notifications_subscriber_service::*;
pub use notifications_subscriber_service_impl::*;
