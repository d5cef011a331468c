use crate::dto::NotificationMessage;
use bson::oid::ObjectId;
use time::OffsetDateTime;

///
/// Durable record of a published notification, the source of truth
/// for catch-up queries and read/resolved state.
///
/// Created exactly once at publish time. Mutated only by the explicit
/// mark-read/mark-resolved operations, deleted only by the
/// administrative purge of already-read records.
///
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    pub id: ObjectId,
    pub message: NotificationMessage,
    pub read_status: bool,
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<OffsetDateTime>,
}
