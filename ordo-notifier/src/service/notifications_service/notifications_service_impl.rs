use super::NotificationsService;
use crate::{
    dto::ModuleType,
    error::Error,
    repository::{self, NotificationRecord, NotificationsRepository},
};
use async_trait::async_trait;
use bson::oid::ObjectId;
use std::{sync::Arc, time::Duration};
use time::OffsetDateTime;
use uuid::Uuid;

pub struct NotificationsServiceImpl {
    repository: Arc<dyn NotificationsRepository>,
}

impl NotificationsServiceImpl {
    pub fn new(repository: Arc<dyn NotificationsRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl NotificationsService for NotificationsServiceImpl {
    async fn missed_since(
        &self,
        device_id: Option<Uuid>,
        last_seen: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error> {
        tracing::info!(?device_id, %last_seen, "finding missed notifications");

        let records = self.repository.find_many_after(device_id, last_seen).await?;
        tracing::info!(count = records.len(), "found missed notifications");

        Ok(records)
    }

    async fn missed_since_by_module(
        &self,
        module: ModuleType,
        last_seen: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error> {
        tracing::info!(%module, %last_seen, "finding missed notifications for module");

        let records = self
            .repository
            .find_many_after_by_module(module, last_seen)
            .await?;
        tracing::info!(count = records.len(), "found missed notifications");

        Ok(records)
    }

    async fn recent(
        &self,
        module: Option<ModuleType>,
        days: u32,
    ) -> Result<Vec<NotificationRecord>, Error> {
        tracing::info!(?module, days, "finding recent notifications");

        if days == 0 {
            return Err(Error::Validation("days must be positive"));
        }

        let since = OffsetDateTime::now_utc() - Duration::from_secs(u64::from(days) * 86_400);
        let records = self.repository.find_many_since(module, since).await?;
        tracing::info!(count = records.len(), "found recent notifications");

        Ok(records)
    }

    async fn find_notification(&self, id: ObjectId) -> Result<NotificationRecord, Error> {
        tracing::info!(id = id.to_hex(), "finding notification");

        let record = self
            .repository
            .find(id)
            .await?
            .ok_or(Error::NotificationNotExist)?;

        Ok(record)
    }

    async fn mark_read(&self, id: ObjectId) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), "marking notification read");

        self.repository
            .update_read(id)
            .await
            .map_err(|err| match err {
                repository::Error::NoDocumentUpdated => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;

        tracing::info!("marked notification read");

        Ok(())
    }

    async fn mark_resolved(&self, id: ObjectId, resolved_by: String) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), resolved_by, "marking notification resolved");

        self.repository
            .update_resolved(id, resolved_by, OffsetDateTime::now_utc())
            .await
            .map_err(|err| match err {
                repository::Error::NoDocumentUpdated => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;

        tracing::info!("marked notification resolved");

        Ok(())
    }

    async fn delete_read(&self, id: ObjectId) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), "deleting read notification");

        self.repository
            .delete_read(id)
            .await
            .map_err(|err| match err {
                repository::Error::NoDocumentUpdated => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;

        tracing::info!("deleted notification");

        Ok(())
    }
}
