//!
//! Deterministic topic naming and routing.
//!
//! Topic names are pure functions of the message fields so that
//! independently deployed clients agree on them without coordination.
//!

use crate::dto::{ModuleType, NotificationMessage};
use uuid::Uuid;

/// Broadcast topic every client may subscribe to.
pub const ALL_NOTIFICATIONS_TOPIC: &str = "notifications.all";

/// Topic carrying everything addressed to one department.
pub fn module_topic(module: ModuleType) -> String {
    format!("notifications.module.{}", module.to_string().to_lowercase())
}

///
/// Narrow topic scoped to one (module, action, entity type) triple,
/// letting a client subscribe to a subset of event kinds within a
/// module without receiving everything.
///
pub fn action_topic(module: ModuleType, action: &str, entity_type: &str) -> String {
    format!(
        "notifications.module.{}.{}.{}",
        module.to_string().to_lowercase(),
        action.to_lowercase(),
        entity_type.to_lowercase(),
    )
}

/// Topic carrying messages directed at one specific client process.
pub fn device_topic(device_id: Uuid) -> String {
    format!("notifications.device.{device_id}")
}

///
/// Resolves the topics a message must be published on.
///
/// - `target_device_id` set: exactly the device topic. Directed
///   messages never fan out further.
/// - `target_module` set: the target department's module topic,
///   never the broadcast topic.
/// - neither: the broadcast topic.
///
/// In the module/broadcast cases the action channel of the
/// *originating* module is appended when both `action` and
/// `entity_type` are present, so the result is 1 or 2 topics.
///
pub fn resolve_topics(message: &NotificationMessage) -> Vec<String> {
    if let Some(device_id) = message.target_device_id {
        return vec![device_topic(device_id)];
    }

    let mut topics = Vec::with_capacity(2);
    match message.target_module {
        Some(target_module) => topics.push(module_topic(target_module)),
        None => topics.push(ALL_NOTIFICATIONS_TOPIC.to_string()),
    }

    if !message.action.is_empty() {
        if let Some(entity_type) = &message.entity_type {
            topics.push(action_topic(message.module, &message.action, entity_type));
        }
    }

    topics
}
