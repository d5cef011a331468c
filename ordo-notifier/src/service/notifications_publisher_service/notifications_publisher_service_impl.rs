use super::NotificationsPublisherService;
use crate::{
    channels,
    dto::{ModuleType, NotificationMessage, NotificationPriority, NotificationType},
    error::Error,
    repository::NotificationsRepository,
};
use async_trait::async_trait;
use rabbitmq_broker::MessageBroker;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct NotificationsPublisherServiceImpl {
    device_id: Uuid,
    repository: Arc<dyn NotificationsRepository>,
    broker: Arc<dyn MessageBroker>,
}

impl NotificationsPublisherServiceImpl {
    pub fn new(
        device_id: Uuid,
        repository: Arc<dyn NotificationsRepository>,
        broker: Arc<dyn MessageBroker>,
    ) -> Self {
        Self {
            device_id,
            repository,
            broker,
        }
    }

    async fn try_publish(&self, mut message: NotificationMessage) -> Result<(), Error> {
        if message.source_device_id.is_none() {
            message.source_device_id = Some(self.device_id);
        }

        message.validate()?;

        if message.notification_type == NotificationType::Refresh {
            tracing::trace!("refresh signal, skipping persistence");
        } else {
            // persistence must happen before any broker publication
            match self.repository.insert(message.clone()).await {
                Ok(record) => tracing::info!(id = record.id.to_hex(), "persisted notification"),
                // without a durable record catch-up will not find this one
                Err(err) => tracing::warn!(%err, "failed to persist notification"),
            }
        }

        let payload = serde_json::to_vec(&message)?;
        for topic in channels::resolve_topics(&message) {
            match self.broker.publish(topic.clone(), payload.clone()).await {
                Ok(()) => tracing::trace!(topic, "published"),
                Err(err) => tracing::warn!(%err, topic, "failed to publish on topic"),
            }
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationsPublisherService for NotificationsPublisherServiceImpl {
    #[tracing::instrument(
        name = "Notifications Publisher",
        skip_all,
        fields(
            module = %message.module,
            action = message.action,
        )
    )]
    async fn publish(&self, message: NotificationMessage) {
        tracing::info!("publishing notification");
        tracing::trace!(?message);

        if let Err(err) = self.try_publish(message).await {
            tracing::warn!(%err, "failed to publish notification");
        }
    }

    async fn publish_refresh(&self, module: ModuleType, target_module: Option<ModuleType>) {
        let message = NotificationMessage {
            notification_type: NotificationType::Refresh,
            module,
            action: "REFRESH".to_string(),
            entity_type: None,
            entity_id: None,
            title: "refresh".to_string(),
            message: "refresh".to_string(),
            target_module,
            target_device_id: None,
            priority: NotificationPriority::Low,
            created_by: "system".to_string(),
            source_device_id: Some(self.device_id),
            metadata: None,
            exclude_sender: true,
            timestamp: OffsetDateTime::now_utc(),
        };

        self.publish(message).await;
    }
}
