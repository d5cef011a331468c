use crate::dto::{ModuleType, NotificationMessage};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsPublisherService: Send + Sync {
    ///
    /// Validate, enrich, persist and publish a notification.
    ///
    /// Fire and forget: persistence happens before broker publication
    /// so a client reacting to the broker event immediately finds the
    /// record, each resolved topic is published independently, and no
    /// failure at any step ever propagates into the business operation
    /// that triggered the notification.
    ///
    /// REFRESH-typed messages are never persisted.
    ///
    async fn publish(&self, message: NotificationMessage);

    ///
    /// Publish a UI-refresh-only signal: broadcast (or targeted at one
    /// department) and never stored, it carries no durable business
    /// meaning beyond "re-fetch your view".
    ///
    async fn publish_refresh(&self, module: ModuleType, target_module: Option<ModuleType>);
}
