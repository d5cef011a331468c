use crate::{
    dto::{ModuleType, NotificationMessage, NotificationPriority, NotificationType},
    repository::NotificationRecord,
};
use bson::{oid::ObjectId, DateTime, Uuid};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct NotificationInsertEntity {
    pub notification_type: NotificationType,
    pub module: ModuleType,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub title: String,
    pub message: String,
    pub target_module: Option<ModuleType>,
    pub target_device_id: Option<Uuid>,
    pub priority: NotificationPriority,
    pub created_by: String,
    pub source_device_id: Option<Uuid>,
    /// metadata is kept as its serialized JSON form
    pub metadata: Option<String>,
    pub exclude_sender: bool,
    pub timestamp: DateTime,
    pub read_status: bool,
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime>,
}

impl From<&NotificationMessage> for NotificationInsertEntity {
    fn from(message: &NotificationMessage) -> Self {
        Self {
            notification_type: message.notification_type,
            module: message.module,
            action: message.action.clone(),
            entity_type: message.entity_type.clone(),
            entity_id: message.entity_id.clone(),
            title: message.title.clone(),
            message: message.message.clone(),
            target_module: message.target_module,
            target_device_id: message.target_device_id.map(Uuid::from),
            priority: message.priority,
            created_by: message.created_by.clone(),
            source_device_id: message.source_device_id.map(Uuid::from),
            metadata: message.metadata.as_ref().map(|value| value.to_string()),
            exclude_sender: message.exclude_sender,
            timestamp: DateTime::from(message.timestamp),
            read_status: false,
            resolved: false,
            resolved_by: None,
            resolved_at: None,
        }
    }
}

#[derive(Deserialize)]
pub struct NotificationFindEntity {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub notification_type: NotificationType,
    pub module: ModuleType,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub title: String,
    pub message: String,
    pub target_module: Option<ModuleType>,
    pub target_device_id: Option<Uuid>,
    pub priority: NotificationPriority,
    pub created_by: String,
    pub source_device_id: Option<Uuid>,
    pub metadata: Option<String>,
    pub exclude_sender: bool,
    pub timestamp: DateTime,
    pub read_status: bool,
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime>,
}

impl From<NotificationFindEntity> for NotificationRecord {
    fn from(entity: NotificationFindEntity) -> Self {
        let metadata = entity.metadata.as_deref().and_then(|raw| {
            match serde_json::from_str(raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(%err, "malformed notification metadata");
                    None
                }
            }
        });

        Self {
            id: entity.id,
            message: NotificationMessage {
                notification_type: entity.notification_type,
                module: entity.module,
                action: entity.action,
                entity_type: entity.entity_type,
                entity_id: entity.entity_id,
                title: entity.title,
                message: entity.message,
                target_module: entity.target_module,
                target_device_id: entity.target_device_id.map(uuid::Uuid::from),
                priority: entity.priority,
                created_by: entity.created_by,
                source_device_id: entity.source_device_id.map(uuid::Uuid::from),
                metadata,
                exclude_sender: entity.exclude_sender,
                timestamp: entity.timestamp.to_time_0_3(),
            },
            read_status: entity.read_status,
            resolved: entity.resolved,
            resolved_by: entity.resolved_by,
            resolved_at: entity.resolved_at.map(DateTime::to_time_0_3),
        }
    }
}
