use super::{NotificationListener, NotificationsSubscriberService};
use crate::{
    channels,
    dto::{ModuleType, NotificationMessage},
};
use async_trait::async_trait;
use rabbitmq_broker::{InboundMessageHandler, MessageBroker};
use std::{
    collections::HashSet,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock,
    },
};
use strum::IntoEnumIterator;
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct NotificationsSubscriberServiceImpl {
    device_id: Uuid,
    broker: Arc<dyn MessageBroker>,
    dispatcher: Arc<NotificationsDispatcher>,

    /// Topics with an active broker subscription
    topics: Mutex<HashSet<String>>,
    /// Topics requested before initialization, flushed by it
    deferred: Mutex<HashSet<String>>,
    ready: AtomicBool,
}

impl NotificationsSubscriberServiceImpl {
    pub fn new(device_id: Uuid, broker: Arc<dyn MessageBroker>) -> Self {
        let dispatcher = Arc::new(NotificationsDispatcher {
            device_id,
            listeners: RwLock::new(Vec::new()),
        });

        Self {
            device_id,
            broker,
            dispatcher,
            topics: Mutex::new(HashSet::new()),
            deferred: Mutex::new(HashSet::new()),
            ready: AtomicBool::new(false),
        }
    }

    async fn subscribe_topic(&self, topic: String) {
        if !self.ready.load(Ordering::Acquire) {
            tracing::warn!(topic, "subscriber not initialized, deferring subscription");
            self.deferred.lock().await.insert(topic);
            return;
        }

        let mut topics = self.topics.lock().await;
        if topics.contains(&topic) {
            tracing::trace!(topic, "already subscribed");
            return;
        }

        let handler = Arc::clone(&self.dispatcher) as Arc<dyn InboundMessageHandler>;
        match self.broker.subscribe(topic.clone(), handler).await {
            Ok(()) => {
                tracing::info!(topic, "subscribed");
                topics.insert(topic);
            }
            Err(err) => tracing::warn!(%err, topic, "failed to subscribe"),
        }
    }
}

#[async_trait]
impl NotificationsSubscriberService for NotificationsSubscriberServiceImpl {
    #[tracing::instrument(name = "Notifications Subscriber", skip_all)]
    async fn initialize(&self) {
        if self.ready.swap(true, Ordering::AcqRel) {
            tracing::warn!("subscriber already initialized");
            return;
        }

        self.subscribe_topic(channels::device_topic(self.device_id))
            .await;

        let deferred = {
            let mut deferred = self.deferred.lock().await;
            deferred.drain().collect::<Vec<_>>()
        };
        for topic in deferred {
            self.subscribe_topic(topic).await;
        }

        tracing::info!("subscriber initialized");
    }

    async fn subscribe_to_module(&self, module: ModuleType) {
        self.subscribe_topic(channels::ALL_NOTIFICATIONS_TOPIC.to_string())
            .await;
        self.subscribe_topic(channels::module_topic(module)).await;
        self.subscribe_topic(channels::device_topic(self.device_id))
            .await;
    }

    async fn subscribe_to_action(&self, module: ModuleType, action: String, entity_type: String) {
        self.subscribe_topic(channels::action_topic(module, &action, &entity_type))
            .await;
    }

    async fn subscribe_to_all(&self) {
        self.subscribe_topic(channels::ALL_NOTIFICATIONS_TOPIC.to_string())
            .await;
        for module in ModuleType::iter() {
            self.subscribe_topic(channels::module_topic(module)).await;
        }
        self.subscribe_topic(channels::device_topic(self.device_id))
            .await;
    }

    async fn unsubscribe(&self, topic: String) {
        let subscribed = self.topics.lock().await.remove(&topic);
        if subscribed {
            if let Err(err) = self.broker.unsubscribe(topic.clone()).await {
                tracing::warn!(%err, topic, "failed to unsubscribe");
            } else {
                tracing::info!(topic, "unsubscribed");
            }
            return;
        }

        let deferred = self.deferred.lock().await.remove(&topic);
        match deferred {
            true => tracing::info!(topic, "dropped deferred subscription"),
            false => tracing::trace!(topic, "not subscribed"),
        }
    }

    async fn unsubscribe_all(&self) {
        let topics = {
            let mut topics = self.topics.lock().await;
            topics.drain().collect::<Vec<_>>()
        };
        for topic in topics {
            if let Err(err) = self.broker.unsubscribe(topic.clone()).await {
                tracing::warn!(%err, topic, "failed to unsubscribe");
            }
        }

        self.deferred.lock().await.clear();
    }

    fn add_listener(&self, listener: Arc<dyn NotificationListener>) {
        let mut listeners = self
            .dispatcher
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.push(listener);

        tracing::debug!(count = listeners.len(), "listener added");
    }

    fn remove_listener(&self, listener: &Arc<dyn NotificationListener>) {
        let mut listeners = self
            .dispatcher
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|registered| !Arc::ptr_eq(registered, listener));

        tracing::debug!(count = listeners.len(), "listener removed");
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    #[tracing::instrument(name = "Notifications Subscriber", skip_all)]
    async fn close(&self) {
        tracing::info!("closing subscriber");

        self.unsubscribe_all().await;
        self.dispatcher
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.ready.store(false, Ordering::Release);

        tracing::info!("subscriber closed");
    }
}

///
/// Inbound side of the subscriber, invoked on the broker's delivery
/// task. Kept separate so the broker holds no reference to the
/// service itself.
///
struct NotificationsDispatcher {
    device_id: Uuid,

    /// Mutated by UI threads while dispatch iterates; every dispatch
    /// works on a snapshot, never on the live list.
    listeners: RwLock<Vec<Arc<dyn NotificationListener>>>,
}

#[async_trait]
impl InboundMessageHandler for NotificationsDispatcher {
    #[tracing::instrument(name = "Notifications Dispatcher", skip_all, fields(topic = topic))]
    async fn handle(&self, topic: &str, payload: &[u8]) {
        let message = match serde_json::from_slice::<NotificationMessage>(payload) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(%err, topic, "dropping malformed notification payload");
                return;
            }
        };

        if message.exclude_sender && message.source_device_id == Some(self.device_id) {
            tracing::trace!("skipping own notification");
            return;
        }

        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        tracing::trace!(count = listeners.len(), "dispatching notification");

        for listener in listeners {
            let dispatch = catch_unwind(AssertUnwindSafe(|| {
                listener.on_notification(&message);
            }));
            if dispatch.is_err() {
                tracing::error!("notification listener panicked");
            }
        }
    }
}
