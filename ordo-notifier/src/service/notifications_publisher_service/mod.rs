mod notifications_publisher_service;
mod notifications_publisher_service_impl;

pub use notifications_publisher_service::*;
pub use notifications_publisher_service_impl::*;
