use super::{dto::NotificationRecord, error::Error};
use crate::dto::{ModuleType, NotificationMessage};
use async_trait::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    ///
    /// Inserts a new record derived from the message with
    /// read_status = false and resolved = false.
    ///
    /// ### Returns
    /// The stored record with its assigned id
    ///
    async fn insert(&self, message: NotificationMessage) -> Result<NotificationRecord, Error>;

    ///
    /// Finds one record by id
    ///
    async fn find(&self, id: ObjectId) -> Result<Option<NotificationRecord>, Error>;

    ///
    /// Finds records published after the timestamp.
    ///
    /// With a device id, only records addressed to that device plus
    /// plain broadcasts (no target module, no target device) are
    /// returned. Without one every record after the timestamp is
    /// returned. Records are sorted ascending by publish timestamp.
    ///
    async fn find_many_after(
        &self,
        target_device_id: Option<Uuid>,
        after: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error>;

    ///
    /// Finds records published after the timestamp that are addressed
    /// to the module or are plain broadcasts.
    /// Records are sorted ascending by publish timestamp.
    ///
    async fn find_many_after_by_module(
        &self,
        module: ModuleType,
        after: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error>;

    ///
    /// Finds records published at or after the timestamp, optionally
    /// restricted to one module (plain broadcasts included).
    /// Records are sorted descending by publish timestamp.
    ///
    async fn find_many_since(
        &self,
        module: Option<ModuleType>,
        since: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error>;

    ///
    /// Marks a record as read
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when the record does not exist
    ///
    async fn update_read(&self, id: ObjectId) -> Result<(), Error>;

    ///
    /// Marks a record as resolved
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when the record does not exist
    ///
    async fn update_resolved(
        &self,
        id: ObjectId,
        resolved_by: String,
        resolved_at: OffsetDateTime,
    ) -> Result<(), Error>;

    ///
    /// Deletes an already-read record (administrative purge).
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when the record does not exist
    ///   or has not been read yet
    ///
    async fn delete_read(&self, id: ObjectId) -> Result<(), Error>;
}
