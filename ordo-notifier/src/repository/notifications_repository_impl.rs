use super::{
    dto::NotificationRecord,
    entity::{NotificationFindEntity, NotificationInsertEntity},
    Error, NotificationsRepository,
};
use crate::dto::{ModuleType, NotificationMessage};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{error::ErrorKind, options::IndexOptions, Collection, Database, IndexModel};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

const NOTIFICATIONS: &str = "notifications";
const INDEX_NAME_TIMESTAMP: &str = "index_timestamp";
const INDEX_NAME_TARGET_MODULE_TIMESTAMP: &str = "index_target_module_timestamp";
const INDEX_NAME_TARGET_DEVICE_TIMESTAMP: &str = "index_target_device_id_timestamp";

pub struct NotificationsRepositoryImpl {
    database: Database,
}

impl NotificationsRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        let collection_names = database.list_collection_names().await?;
        if !collection_names.iter().any(|name| name == NOTIFICATIONS) {
            database.create_collection(NOTIFICATIONS).await?;
        }

        let collection = database.collection::<Document>(NOTIFICATIONS);
        let index_names = collection.list_index_names().await?;

        for (name, keys) in [
            (INDEX_NAME_TIMESTAMP, doc! { "timestamp": 1 }),
            (
                INDEX_NAME_TARGET_MODULE_TIMESTAMP,
                doc! { "target_module": 1, "timestamp": 1 },
            ),
            (
                INDEX_NAME_TARGET_DEVICE_TIMESTAMP,
                doc! { "target_device_id": 1, "timestamp": 1 },
            ),
        ] {
            if !index_names.contains(&name.to_string()) {
                Self::create_index(&collection, name, keys).await?;
                tracing::debug!("created index {NOTIFICATIONS}.{name}");
            }
        }

        Ok(Self { database })
    }

    async fn create_index(
        collection: &Collection<Document>,
        name: &str,
        keys: Document,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().name(name.to_string()).build())
            .build();

        collection.create_index(index).await?;

        Ok(())
    }

    async fn find_many(
        &self,
        filter: Document,
        sort: Document,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let entities: Vec<NotificationFindEntity> = self
            .database
            .collection(NOTIFICATIONS)
            .find(filter)
            .sort(sort)
            .await?
            .try_collect()
            .await?;

        let records = entities.into_iter().map(NotificationRecord::from).collect();

        Ok(records)
    }
}

#[async_trait]
impl NotificationsRepository for NotificationsRepositoryImpl {
    async fn insert(&self, message: NotificationMessage) -> Result<NotificationRecord, Error> {
        let insert_entity = NotificationInsertEntity::from(&message);

        let insert_result = self
            .database
            .collection::<NotificationInsertEntity>(NOTIFICATIONS)
            .insert_one(&insert_entity)
            .await?;

        let Bson::ObjectId(id) = insert_result.inserted_id else {
            tracing::error!("invalid type of inserted '_id'");
            return Err(Error::Mongo(
                ErrorKind::Custom(Arc::new("invalid type of inserted '_id'")).into(),
            ));
        };

        Ok(NotificationRecord {
            id,
            message,
            read_status: false,
            resolved: false,
            resolved_by: None,
            resolved_at: None,
        })
    }

    async fn find(&self, id: ObjectId) -> Result<Option<NotificationRecord>, Error> {
        let entity: Option<NotificationFindEntity> = self
            .database
            .collection(NOTIFICATIONS)
            .find_one(doc! { "_id": id })
            .await?;

        Ok(entity.map(NotificationRecord::from))
    }

    async fn find_many_after(
        &self,
        target_device_id: Option<Uuid>,
        after: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let after = DateTime::from(after);
        let filter = match target_device_id {
            Some(device_id) => doc! {
                "timestamp": { "$gt": after },
                "$or": [
                    { "target_device_id": bson::Uuid::from(device_id) },
                    { "target_device_id": Bson::Null, "target_module": Bson::Null },
                ],
            },
            None => doc! {
                "timestamp": { "$gt": after },
            },
        };

        self.find_many(filter, doc! { "timestamp": 1 }).await
    }

    async fn find_many_after_by_module(
        &self,
        module: ModuleType,
        after: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let filter = doc! {
            "timestamp": { "$gt": DateTime::from(after) },
            "$or": [
                { "target_module": module.to_string() },
                { "target_module": Bson::Null, "target_device_id": Bson::Null },
            ],
        };

        self.find_many(filter, doc! { "timestamp": 1 }).await
    }

    async fn find_many_since(
        &self,
        module: Option<ModuleType>,
        since: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let mut filter = doc! {
            "timestamp": { "$gte": DateTime::from(since) },
        };
        if let Some(module) = module {
            filter.insert(
                "$or",
                vec![
                    doc! { "target_module": module.to_string() },
                    doc! { "target_module": Bson::Null, "target_device_id": Bson::Null },
                ],
            );
        }

        self.find_many(filter, doc! { "timestamp": -1 }).await
    }

    async fn update_read(&self, id: ObjectId) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "read_status": true } },
            )
            .await?;

        match update_result.matched_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn update_resolved(
        &self,
        id: ObjectId,
        resolved_by: String,
        resolved_at: OffsetDateTime,
    ) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "resolved": true,
                        "resolved_by": resolved_by,
                        "resolved_at": DateTime::from(resolved_at),
                    }
                },
            )
            .await?;

        match update_result.matched_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn delete_read(&self, id: ObjectId) -> Result<(), Error> {
        let delete_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .delete_one(doc! { "_id": id, "read_status": true })
            .await?;

        match delete_result.deleted_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }
}
