use super::{DevicePresenceService, DevicePresenceServiceConfig, RegisteredDevice};
use crate::{
    dto::{DeviceStatus, ModuleType, UserContext},
    error::Error,
    repository::{self, DeviceRegistration, DevicesRepository},
};
use async_trait::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct DevicePresenceServiceImpl {
    config: DevicePresenceServiceConfig,
    repository: Arc<dyn DevicesRepository>,

    /// One identity per running client process
    device_id: Uuid,
}

impl DevicePresenceServiceImpl {
    pub fn new(
        config: DevicePresenceServiceConfig,
        repository: Arc<dyn DevicesRepository>,
    ) -> Self {
        let device_id = Uuid::new_v4();

        Self {
            config,
            repository,
            device_id,
        }
    }
}

#[async_trait]
impl DevicePresenceService for DevicePresenceServiceImpl {
    fn device_id(&self) -> Uuid {
        self.device_id
    }

    #[tracing::instrument(
        name = "Device Presence",
        skip_all,
        fields(
            device_id = %self.device_id,
            user_id = %user.user_id,
        )
    )]
    async fn register(
        &self,
        user: UserContext,
        module: ModuleType,
    ) -> Result<RegisteredDevice, Error> {
        tracing::info!(%module, "registering device");

        // The user's checkpoint must be captured before this session
        // overwrites the device record. Per user, not per device.
        let previous_last_seen = self
            .repository
            .find_latest_by_user(user.user_id)
            .await?
            .map(|registration| registration.last_heartbeat);

        let now = OffsetDateTime::now_utc();
        let registration = DeviceRegistration {
            device_id: self.device_id,
            user_id: user.user_id,
            username: user.username,
            module,
            status: DeviceStatus::Online,
            last_heartbeat: now,
            registered_at: now,
            ip_address: self.config.ip_address.clone(),
            hostname: self.config.hostname.clone(),
        };
        self.repository.upsert_registration(registration).await?;

        tracing::info!(?previous_last_seen, "registered device");

        Ok(RegisteredDevice {
            device_id: self.device_id,
            previous_last_seen,
        })
    }

    async fn heartbeat(&self) {
        let result = self
            .repository
            .update_heartbeat(self.device_id, OffsetDateTime::now_utc())
            .await;

        match result {
            Ok(()) => tracing::trace!(device_id = %self.device_id, "heartbeat"),
            Err(repository::Error::NoDocumentUpdated) => {
                tracing::warn!(device_id = %self.device_id, "heartbeat for unregistered device")
            }
            Err(err) => tracing::warn!(%err, "failed to persist heartbeat"),
        }
    }

    async fn set_offline(&self) {
        let result = self
            .repository
            .update_status(self.device_id, DeviceStatus::Offline)
            .await;

        match result {
            Ok(()) => tracing::info!(device_id = %self.device_id, "device set offline"),
            Err(repository::Error::NoDocumentUpdated) => {
                tracing::warn!(device_id = %self.device_id, "set offline for unregistered device")
            }
            Err(err) => tracing::warn!(%err, "failed to set device offline"),
        }
    }

    async fn sweep_stale(&self) {
        let cutoff = OffsetDateTime::now_utc() - self.config.offline_timeout;

        match self.repository.update_many_stale_offline(cutoff).await {
            Ok(count) if count > 0 => tracing::info!(count, "marked stale devices offline"),
            Ok(_) => tracing::trace!("no stale devices"),
            Err(err) => tracing::warn!(%err, "presence sweep failed"),
        }
    }

    async fn online_devices(
        &self,
        module: Option<ModuleType>,
    ) -> Result<Vec<DeviceRegistration>, Error> {
        let devices = self.repository.find_many_online(module).await?;

        Ok(devices)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::MockDevicesRepository;
    use mockall::{predicate, Sequence};
    use std::time::Duration;
    use time::macros::datetime;

    fn create_config() -> DevicePresenceServiceConfig {
        DevicePresenceServiceConfig {
            offline_timeout: Duration::from_secs(180),
            sweep_interval: Duration::from_secs(60),
            heartbeat_interval: Duration::from_secs(30),
            ip_address: Some("10.0.0.17".to_string()),
            hostname: Some("ws-sales-03".to_string()),
        }
    }

    fn create_registration(
        device_id: Uuid,
        user_id: Uuid,
        last_heartbeat: OffsetDateTime,
    ) -> DeviceRegistration {
        DeviceRegistration {
            device_id,
            user_id,
            username: "j.kowalski".to_string(),
            module: ModuleType::Sales,
            status: DeviceStatus::Offline,
            last_heartbeat,
            registered_at: last_heartbeat,
            ip_address: None,
            hostname: None,
        }
    }

    fn database_error() -> repository::Error {
        repository::Error::Mongo(
            mongodb::error::ErrorKind::Custom(Arc::new("any database error")).into(),
        )
    }

    #[tokio::test]
    async fn register_returns_users_previous_session_timestamp() {
        let user_id = Uuid::new_v4();
        let previous_heartbeat = datetime!(2024-05-20 08:15:00 UTC);

        let mut repository = MockDevicesRepository::new();
        repository
            .expect_find_latest_by_user()
            .with(predicate::eq(user_id))
            .returning(move |_| {
                Ok(Some(create_registration(
                    Uuid::new_v4(),
                    user_id,
                    previous_heartbeat,
                )))
            });
        repository.expect_upsert_registration().returning(|_| Ok(()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        let registered = service
            .register(
                UserContext {
                    user_id,
                    username: "j.kowalski".to_string(),
                },
                ModuleType::Sales,
            )
            .await
            .unwrap();

        assert_eq!(registered.previous_last_seen, Some(previous_heartbeat));
        assert_eq!(registered.device_id, service.device_id());
    }

    #[tokio::test]
    async fn register_first_login_returns_none() {
        let mut repository = MockDevicesRepository::new();
        repository.expect_find_latest_by_user().returning(|_| Ok(None));
        repository.expect_upsert_registration().returning(|_| Ok(()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        let registered = service
            .register(
                UserContext {
                    user_id: Uuid::new_v4(),
                    username: "a.nowak".to_string(),
                },
                ModuleType::Projects,
            )
            .await
            .unwrap();

        assert_eq!(registered.previous_last_seen, None);
    }

    #[tokio::test]
    async fn register_captures_checkpoint_before_overwriting() {
        let mut sequence = Sequence::new();

        let mut repository = MockDevicesRepository::new();
        repository
            .expect_find_latest_by_user()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(None));
        repository
            .expect_upsert_registration()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        let result = service
            .register(
                UserContext {
                    user_id: Uuid::new_v4(),
                    username: "a.nowak".to_string(),
                },
                ModuleType::Pricing,
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn register_two_users_same_device_keeps_checkpoints_separate() {
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let user_a_heartbeat = datetime!(2024-05-20 08:15:00 UTC);

        let mut repository = MockDevicesRepository::new();
        repository
            .expect_find_latest_by_user()
            .with(predicate::eq(user_a))
            .returning(move |_| {
                Ok(Some(create_registration(
                    Uuid::new_v4(),
                    user_a,
                    user_a_heartbeat,
                )))
            });
        // user B never logged in anywhere, A's checkpoint must not leak
        repository
            .expect_find_latest_by_user()
            .with(predicate::eq(user_b))
            .returning(|_| Ok(None));
        repository.expect_upsert_registration().returning(|_| Ok(()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        let registered_a = service
            .register(
                UserContext {
                    user_id: user_a,
                    username: "j.kowalski".to_string(),
                },
                ModuleType::Sales,
            )
            .await
            .unwrap();
        let registered_b = service
            .register(
                UserContext {
                    user_id: user_b,
                    username: "a.nowak".to_string(),
                },
                ModuleType::Sales,
            )
            .await
            .unwrap();

        assert_eq!(registered_a.previous_last_seen, Some(user_a_heartbeat));
        assert_eq!(registered_b.previous_last_seen, None);
        assert_eq!(registered_a.device_id, registered_b.device_id);
    }

    #[tokio::test]
    async fn register_upserts_online_record_with_fresh_heartbeat() {
        let user_id = Uuid::new_v4();

        let mut repository = MockDevicesRepository::new();
        repository.expect_find_latest_by_user().returning(|_| Ok(None));
        repository
            .expect_upsert_registration()
            .withf(move |registration| {
                let now = OffsetDateTime::now_utc();
                registration.user_id == user_id
                    && registration.status == DeviceStatus::Online
                    && (now - registration.last_heartbeat).whole_seconds().abs() <= 1
                    && registration.hostname.as_deref() == Some("ws-sales-03")
            })
            .returning(|_| Ok(()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        let result = service
            .register(
                UserContext {
                    user_id,
                    username: "j.kowalski".to_string(),
                },
                ModuleType::Sales,
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn register_database_error() {
        let mut repository = MockDevicesRepository::new();
        repository
            .expect_find_latest_by_user()
            .returning(|_| Err(database_error()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        let result = service
            .register(
                UserContext {
                    user_id: Uuid::new_v4(),
                    username: "j.kowalski".to_string(),
                },
                ModuleType::Sales,
            )
            .await;

        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn heartbeat_refreshes_own_device() {
        let mut repository = MockDevicesRepository::new();
        repository
            .expect_update_heartbeat()
            .withf(|_, at| (OffsetDateTime::now_utc() - *at).whole_seconds().abs() <= 1)
            .times(1)
            .returning(|_, _| Ok(()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        service.heartbeat().await;
    }

    #[tokio::test]
    async fn heartbeat_unknown_device_is_noop() {
        let mut repository = MockDevicesRepository::new();
        repository
            .expect_update_heartbeat()
            .returning(|_, _| Err(repository::Error::NoDocumentUpdated));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        // must not panic or propagate
        service.heartbeat().await;
    }

    #[tokio::test]
    async fn heartbeat_database_error_is_swallowed() {
        let mut repository = MockDevicesRepository::new();
        repository
            .expect_update_heartbeat()
            .returning(|_, _| Err(database_error()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        service.heartbeat().await;
    }

    #[tokio::test]
    async fn set_offline_flips_status_immediately() {
        let mut repository = MockDevicesRepository::new();
        repository
            .expect_update_status()
            .withf(|_, status| *status == DeviceStatus::Offline)
            .times(1)
            .returning(|_, _| Ok(()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        service.set_offline().await;
    }

    #[tokio::test]
    async fn sweep_stale_uses_offline_timeout_cutoff() {
        let config = create_config();
        let offline_timeout = config.offline_timeout;

        let mut repository = MockDevicesRepository::new();
        repository
            .expect_update_many_stale_offline()
            .withf(move |older_than| {
                let expected = OffsetDateTime::now_utc() - offline_timeout;
                (expected - *older_than).whole_seconds().abs() <= 1
            })
            .times(1)
            .returning(|_| Ok(2));
        let service = DevicePresenceServiceImpl::new(config, Arc::new(repository));

        service.sweep_stale().await;
    }

    #[tokio::test]
    async fn sweep_stale_database_error_is_swallowed() {
        let mut repository = MockDevicesRepository::new();
        repository
            .expect_update_many_stale_offline()
            .returning(|_| Err(database_error()));
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        service.sweep_stale().await;
    }

    #[tokio::test]
    async fn online_devices_filters_by_module() {
        let mut repository = MockDevicesRepository::new();
        repository
            .expect_find_many_online()
            .with(predicate::eq(Some(ModuleType::Storage)))
            .returning(|_| {
                Ok(vec![create_registration(
                    Uuid::new_v4(),
                    Uuid::new_v4(),
                    OffsetDateTime::now_utc(),
                )])
            });
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        let devices = service
            .online_devices(Some(ModuleType::Storage))
            .await
            .unwrap();

        assert_eq!(devices.len(), 1);
    }

    #[tokio::test]
    async fn device_id_is_stable_for_process_lifetime() {
        let repository = MockDevicesRepository::new();
        let service = DevicePresenceServiceImpl::new(create_config(), Arc::new(repository));

        assert_eq!(service.device_id(), service.device_id());
    }
}
