#![allow(dead_code)]

use async_trait::async_trait;
use bson::oid::ObjectId;
use ordo_notifier::{
    dto::{
        DeviceStatus, ModuleType, NotificationMessage, NotificationPriority, NotificationType,
    },
    repository::{
        self, DeviceRegistration, DevicesRepository, NotificationRecord, NotificationsRepository,
    },
    service::notifications_subscriber_service::NotificationListener,
};
use rabbitmq_broker::{InboundMessageHandler, MessageBroker};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use time::OffsetDateTime;
use uuid::Uuid;

///
/// In-process [MessageBroker]: publish dispatches synchronously to
/// every handler subscribed to exactly that topic.
///
pub struct InMemoryMessageBroker {
    handlers: Mutex<HashMap<String, Vec<Arc<dyn InboundMessageHandler>>>>,
}

impl InMemoryMessageBroker {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl MessageBroker for InMemoryMessageBroker {
    async fn publish(&self, topic: String, payload: Vec<u8>) -> anyhow::Result<()> {
        let handlers = self
            .handlers
            .lock()
            .unwrap()
            .get(&topic)
            .cloned()
            .unwrap_or_default();

        for handler in handlers {
            handler.handle(&topic, &payload).await;
        }

        Ok(())
    }

    async fn subscribe(
        &self,
        topic: String,
        handler: Arc<dyn InboundMessageHandler>,
    ) -> anyhow::Result<()> {
        self.handlers
            .lock()
            .unwrap()
            .entry(topic)
            .or_default()
            .push(handler);

        Ok(())
    }

    async fn unsubscribe(&self, topic: String) -> anyhow::Result<()> {
        self.handlers.lock().unwrap().remove(&topic);

        Ok(())
    }
}

///
/// [NotificationsRepository] over a plain vector, mirroring the
/// filter semantics of the MongoDB implementation.
///
pub struct InMemoryNotificationsRepository {
    records: Mutex<Vec<NotificationRecord>>,
}

impl InMemoryNotificationsRepository {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn is_plain_broadcast(message: &NotificationMessage) -> bool {
        message.target_module.is_none() && message.target_device_id.is_none()
    }
}

#[async_trait]
impl NotificationsRepository for InMemoryNotificationsRepository {
    async fn insert(
        &self,
        message: NotificationMessage,
    ) -> Result<NotificationRecord, repository::Error> {
        let record = NotificationRecord {
            id: ObjectId::new(),
            message,
            read_status: false,
            resolved: false,
            resolved_by: None,
            resolved_at: None,
        };
        self.records.lock().unwrap().push(record.clone());

        Ok(record)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<NotificationRecord>, repository::Error> {
        let record = self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id == id)
            .cloned();

        Ok(record)
    }

    async fn find_many_after(
        &self,
        target_device_id: Option<Uuid>,
        after: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, repository::Error> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.message.timestamp > after)
            .filter(|record| match target_device_id {
                Some(device_id) => {
                    record.message.target_device_id == Some(device_id)
                        || Self::is_plain_broadcast(&record.message)
                }
                None => true,
            })
            .cloned()
            .collect();
        records.sort_by_key(|record| record.message.timestamp);

        Ok(records)
    }

    async fn find_many_after_by_module(
        &self,
        module: ModuleType,
        after: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, repository::Error> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.message.timestamp > after)
            .filter(|record| {
                record.message.target_module == Some(module)
                    || Self::is_plain_broadcast(&record.message)
            })
            .cloned()
            .collect();
        records.sort_by_key(|record| record.message.timestamp);

        Ok(records)
    }

    async fn find_many_since(
        &self,
        module: Option<ModuleType>,
        since: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, repository::Error> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.message.timestamp >= since)
            .filter(|record| match module {
                Some(module) => {
                    record.message.target_module == Some(module)
                        || Self::is_plain_broadcast(&record.message)
                }
                None => true,
            })
            .cloned()
            .collect();
        records.sort_by_key(|record| record.message.timestamp);
        records.reverse();

        Ok(records)
    }

    async fn update_read(&self, id: ObjectId) -> Result<(), repository::Error> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(repository::Error::NoDocumentUpdated)?;
        record.read_status = true;

        Ok(())
    }

    async fn update_resolved(
        &self,
        id: ObjectId,
        resolved_by: String,
        resolved_at: OffsetDateTime,
    ) -> Result<(), repository::Error> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(repository::Error::NoDocumentUpdated)?;
        record.resolved = true;
        record.resolved_by = Some(resolved_by);
        record.resolved_at = Some(resolved_at);

        Ok(())
    }

    async fn delete_read(&self, id: ObjectId) -> Result<(), repository::Error> {
        let mut records = self.records.lock().unwrap();
        let index = records
            .iter()
            .position(|record| record.id == id && record.read_status)
            .ok_or(repository::Error::NoDocumentUpdated)?;
        records.remove(index);

        Ok(())
    }
}

///
/// [DevicesRepository] over a plain vector, keyed by device_id like
/// the MongoDB implementation.
///
pub struct InMemoryDevicesRepository {
    devices: Mutex<Vec<DeviceRegistration>>,
}

impl InMemoryDevicesRepository {
    pub fn new() -> Self {
        Self {
            devices: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DevicesRepository for InMemoryDevicesRepository {
    async fn upsert_registration(
        &self,
        registration: DeviceRegistration,
    ) -> Result<(), repository::Error> {
        let mut devices = self.devices.lock().unwrap();
        match devices
            .iter_mut()
            .find(|device| device.device_id == registration.device_id)
        {
            Some(device) => *device = registration,
            None => devices.push(registration),
        }

        Ok(())
    }

    async fn find_by_device_id(
        &self,
        device_id: Uuid,
    ) -> Result<Option<DeviceRegistration>, repository::Error> {
        let device = self
            .devices
            .lock()
            .unwrap()
            .iter()
            .find(|device| device.device_id == device_id)
            .cloned();

        Ok(device)
    }

    async fn find_latest_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DeviceRegistration>, repository::Error> {
        let device = self
            .devices
            .lock()
            .unwrap()
            .iter()
            .filter(|device| device.user_id == user_id)
            .max_by_key(|device| device.last_heartbeat)
            .cloned();

        Ok(device)
    }

    async fn update_heartbeat(
        &self,
        device_id: Uuid,
        at: OffsetDateTime,
    ) -> Result<(), repository::Error> {
        let mut devices = self.devices.lock().unwrap();
        let device = devices
            .iter_mut()
            .find(|device| device.device_id == device_id)
            .ok_or(repository::Error::NoDocumentUpdated)?;
        device.last_heartbeat = at;
        device.status = DeviceStatus::Online;

        Ok(())
    }

    async fn update_status(
        &self,
        device_id: Uuid,
        status: DeviceStatus,
    ) -> Result<(), repository::Error> {
        let mut devices = self.devices.lock().unwrap();
        let device = devices
            .iter_mut()
            .find(|device| device.device_id == device_id)
            .ok_or(repository::Error::NoDocumentUpdated)?;
        device.status = status;

        Ok(())
    }

    async fn update_many_stale_offline(
        &self,
        older_than: OffsetDateTime,
    ) -> Result<u64, repository::Error> {
        let mut count = 0;
        let mut devices = self.devices.lock().unwrap();
        for device in devices
            .iter_mut()
            .filter(|device| {
                device.status == DeviceStatus::Online && device.last_heartbeat < older_than
            })
        {
            device.status = DeviceStatus::Offline;
            count += 1;
        }

        Ok(count)
    }

    async fn find_many_online(
        &self,
        module: Option<ModuleType>,
    ) -> Result<Vec<DeviceRegistration>, repository::Error> {
        let devices = self
            .devices
            .lock()
            .unwrap()
            .iter()
            .filter(|device| device.status == DeviceStatus::Online)
            .filter(|device| module.map_or(true, |module| device.module == module))
            .cloned()
            .collect();

        Ok(devices)
    }
}

pub struct RecordingListener {
    received: Mutex<Vec<NotificationMessage>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn received(&self) -> Vec<NotificationMessage> {
        self.received.lock().unwrap().clone()
    }

    pub fn received_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl NotificationListener for RecordingListener {
    fn on_notification(&self, notification: &NotificationMessage) {
        self.received.lock().unwrap().push(notification.clone());
    }
}

pub fn create_message(module: ModuleType, action: &str) -> NotificationMessage {
    NotificationMessage {
        notification_type: NotificationType::Info,
        module,
        action: action.to_string(),
        entity_type: None,
        entity_id: None,
        title: "title".to_string(),
        message: "message".to_string(),
        target_module: None,
        target_device_id: None,
        priority: NotificationPriority::Normal,
        created_by: "tests".to_string(),
        source_device_id: None,
        metadata: None,
        exclude_sender: false,
        timestamp: OffsetDateTime::now_utc(),
    }
}
