use super::{dto::DeviceRegistration, entity::DeviceEntity, DevicesRepository, Error};
use crate::dto::{DeviceStatus, ModuleType};
use async_trait::async_trait;
use bson::{doc, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{options::IndexOptions, Collection, Database, IndexModel};
use time::OffsetDateTime;
use uuid::Uuid;

const DEVICES: &str = "devices";
const INDEX_NAME_UNIQUE_DEVICE_ID: &str = "unique_index_device_id";
const INDEX_NAME_USER_ID_LAST_HEARTBEAT: &str = "index_user_id_last_heartbeat";

pub struct DevicesRepositoryImpl {
    database: Database,
}

impl DevicesRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        let collection_names = database.list_collection_names().await?;
        if !collection_names.iter().any(|name| name == DEVICES) {
            database.create_collection(DEVICES).await?;
        }

        let collection = database.collection::<Document>(DEVICES);
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_UNIQUE_DEVICE_ID.to_string()) {
            Self::create_unique_device_id_index(&collection).await?;
            tracing::debug!("created index {DEVICES}.{INDEX_NAME_UNIQUE_DEVICE_ID}");
        }
        if !index_names.contains(&INDEX_NAME_USER_ID_LAST_HEARTBEAT.to_string()) {
            Self::create_user_id_last_heartbeat_index(&collection).await?;
            tracing::debug!("created index {DEVICES}.{INDEX_NAME_USER_ID_LAST_HEARTBEAT}");
        }

        Ok(Self { database })
    }

    async fn create_unique_device_id_index(
        collection: &Collection<Document>,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! {
                "device_id": 1,
            })
            .options(
                IndexOptions::builder()
                    .name(INDEX_NAME_UNIQUE_DEVICE_ID.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        collection.create_index(index).await?;

        Ok(())
    }

    async fn create_user_id_last_heartbeat_index(
        collection: &Collection<Document>,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! {
                "user_id": 1,
                "last_heartbeat": -1,
            })
            .options(
                IndexOptions::builder()
                    .name(INDEX_NAME_USER_ID_LAST_HEARTBEAT.to_string())
                    .build(),
            )
            .build();

        collection.create_index(index).await?;

        Ok(())
    }
}

#[async_trait]
impl DevicesRepository for DevicesRepositoryImpl {
    async fn upsert_registration(&self, registration: DeviceRegistration) -> Result<(), Error> {
        let entity = DeviceEntity::from(&registration);

        self.database
            .collection::<DeviceEntity>(DEVICES)
            .replace_one(
                doc! { "device_id": bson::Uuid::from(registration.device_id) },
                &entity,
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn find_by_device_id(
        &self,
        device_id: Uuid,
    ) -> Result<Option<DeviceRegistration>, Error> {
        let entity: Option<DeviceEntity> = self
            .database
            .collection(DEVICES)
            .find_one(doc! { "device_id": bson::Uuid::from(device_id) })
            .await?;

        Ok(entity.map(DeviceRegistration::from))
    }

    async fn find_latest_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DeviceRegistration>, Error> {
        let entity: Option<DeviceEntity> = self
            .database
            .collection(DEVICES)
            .find_one(doc! { "user_id": bson::Uuid::from(user_id) })
            .sort(doc! { "last_heartbeat": -1 })
            .await?;

        Ok(entity.map(DeviceRegistration::from))
    }

    async fn update_heartbeat(&self, device_id: Uuid, at: OffsetDateTime) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(DEVICES)
            .update_one(
                doc! { "device_id": bson::Uuid::from(device_id) },
                doc! {
                    "$set": {
                        "last_heartbeat": DateTime::from(at),
                        "status": DeviceStatus::Online.to_string(),
                    }
                },
            )
            .await?;

        match update_result.matched_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn update_status(&self, device_id: Uuid, status: DeviceStatus) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(DEVICES)
            .update_one(
                doc! { "device_id": bson::Uuid::from(device_id) },
                doc! { "$set": { "status": status.to_string() } },
            )
            .await?;

        match update_result.matched_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn update_many_stale_offline(&self, older_than: OffsetDateTime) -> Result<u64, Error> {
        let update_result = self
            .database
            .collection::<Document>(DEVICES)
            .update_many(
                doc! {
                    "status": DeviceStatus::Online.to_string(),
                    "last_heartbeat": { "$lt": DateTime::from(older_than) },
                },
                doc! { "$set": { "status": DeviceStatus::Offline.to_string() } },
            )
            .await?;

        Ok(update_result.modified_count)
    }

    async fn find_many_online(
        &self,
        module: Option<ModuleType>,
    ) -> Result<Vec<DeviceRegistration>, Error> {
        let mut filter = doc! {
            "status": DeviceStatus::Online.to_string(),
        };
        if let Some(module) = module {
            filter.insert("module", module.to_string());
        }

        let entities: Vec<DeviceEntity> = self
            .database
            .collection(DEVICES)
            .find(filter)
            .sort(doc! { "last_heartbeat": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(entities.into_iter().map(DeviceRegistration::from).collect())
    }
}
