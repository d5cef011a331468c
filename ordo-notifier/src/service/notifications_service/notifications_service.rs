use crate::{dto::ModuleType, error::Error, repository::NotificationRecord};
use async_trait::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    ///
    /// Find all notifications a reconnecting client missed since its
    /// previous last-seen timestamp.
    ///
    /// With a device id only notifications addressed to that device
    /// (plus plain broadcasts) are returned; without one every missed
    /// notification is returned (administrative catch-up).
    ///
    /// Callers that registered for the first time ever have no
    /// last-seen timestamp and must not issue a catch-up query at all.
    ///
    async fn missed_since(
        &self,
        device_id: Option<Uuid>,
        last_seen: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error>;

    ///
    /// Department-scoped catch-up: notifications addressed to the
    /// module (plus plain broadcasts) published after last_seen.
    ///
    async fn missed_since_by_module(
        &self,
        module: ModuleType,
        last_seen: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error>;

    ///
    /// Bounded history lookback regardless of presence state,
    /// for general browsing rather than catch-up.
    ///
    /// ### Errors
    /// - [Error::Validation] when days is zero
    ///
    async fn recent(
        &self,
        module: Option<ModuleType>,
        days: u32,
    ) -> Result<Vec<NotificationRecord>, Error>;

    ///
    /// Find one notification
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when there is no record with id
    ///
    async fn find_notification(&self, id: ObjectId) -> Result<NotificationRecord, Error>;

    ///
    /// Mark a notification as read
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when there is no record with id
    ///
    async fn mark_read(&self, id: ObjectId) -> Result<(), Error>;

    ///
    /// Mark a notification as resolved
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when there is no record with id
    ///
    async fn mark_resolved(&self, id: ObjectId, resolved_by: String) -> Result<(), Error>;

    ///
    /// Administrative purge of one already-read notification
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when there is no record with id
    ///   or the record has not been read yet
    ///
    async fn delete_read(&self, id: ObjectId) -> Result<(), Error>;
}
