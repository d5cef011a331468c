use super::NotificationListener;
use crate::dto::ModuleType;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait NotificationsSubscriberService: Send + Sync {
    ///
    /// Startup sequence: subscribes this client's own device topic and
    /// flushes subscriptions deferred from before initialization.
    /// Until this runs, subscribe calls are deferred and logged, never
    /// silently dropped.
    ///
    async fn initialize(&self);

    ///
    /// Subscribe to everything relevant to one department: the
    /// broadcast topic, the module topic and this client's own device
    /// topic. Safe to call multiple times, topics are de-duplicated by
    /// name.
    ///
    async fn subscribe_to_module(&self, module: ModuleType);

    ///
    /// Subscribe to a single action channel, a subset of event kinds
    /// within a module.
    ///
    async fn subscribe_to_action(&self, module: ModuleType, action: String, entity_type: String);

    ///
    /// Subscribe to every known topic. Used by administrative clients
    /// that must see everything.
    ///
    async fn subscribe_to_all(&self);

    async fn unsubscribe(&self, topic: String);

    async fn unsubscribe_all(&self);

    ///
    /// Register an in-process listener. Safe to call while a dispatch
    /// is in progress.
    ///
    fn add_listener(&self, listener: Arc<dyn NotificationListener>);

    ///
    /// Remove a previously registered listener (by identity).
    /// In-flight dispatch already started is not interrupted.
    ///
    fn remove_listener(&self, listener: &Arc<dyn NotificationListener>);

    ///
    /// True once the startup sequence completed and inbound messages
    /// are being dispatched.
    ///
    fn is_ready(&self) -> bool;

    ///
    /// Shutdown: unsubscribes from everything and clears listeners so
    /// no broker-side subscription leaks.
    ///
    async fn close(&self);
}
