use super::{ModuleType, NotificationPriority, NotificationType};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

///
/// Wire payload exchanged between department clients.
///
/// Immutable once constructed; `timestamp` is set at creation time and
/// never changes. `action` and `entity_type` stay open strings because
/// the business modules extend them without coordination with this core.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,

    /// Department the event originated in
    pub module: ModuleType,

    /// Free form verb, e.g. "CREATED", "APPROVAL_REQUESTED"
    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    pub title: String,
    pub message: String,

    /// Route to one department only; absent means broadcast
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_module: Option<ModuleType>,

    /// Route to one specific connected client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_device_id: Option<Uuid>,

    pub priority: NotificationPriority,

    pub created_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_device_id: Option<Uuid>,

    /// Opaque structured side-payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// The originating client does not receive its own broadcast
    #[serde(default)]
    pub exclude_sender: bool,

    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl NotificationMessage {
    ///
    /// Required-field validation, enforced by the publisher before a
    /// message is persisted or put on the wire.
    ///
    /// ### Errors
    /// - [Error::Validation] when title or message is empty
    ///
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title cannot be empty"));
        }
        if self.message.trim().is_empty() {
            return Err(Error::Validation("message cannot be empty"));
        }

        Ok(())
    }
}
