pub mod device_presence_service;
pub mod notifications_publisher_service;
pub mod notifications_service;
pub mod notifications_subscriber_service;
