use super::ApplicationEnv;
use crate::service::{
    device_presence_service::{
        DeviceHeartbeatTask, DevicePresenceService, DevicePresenceServiceConfig,
        DevicePresenceServiceImpl, DevicePresenceSweeper,
    },
    notifications_publisher_service::{
        NotificationsPublisherService, NotificationsPublisherServiceImpl,
    },
    notifications_service::{NotificationsService, NotificationsServiceImpl},
    notifications_subscriber_service::{
        NotificationsSubscriberService, NotificationsSubscriberServiceImpl,
    },
};
use crate::repository::{DevicesRepositoryImpl, NotificationsRepositoryImpl};
use amqprs::connection::OpenConnectionArguments;
use mongodb::{options::ClientOptions, Client};
use rabbitmq_broker::{MessageBroker, RabbitmqMessageBroker, RabbitmqMessageBrokerConfig};
use std::sync::Arc;
use tokio::{sync::Notify, task::JoinHandle};

#[derive(Clone)]
pub struct ApplicationState {
    pub presence_service: Arc<dyn DevicePresenceService>,
    pub publisher_service: Arc<dyn NotificationsPublisherService>,
    pub subscriber_service: Arc<dyn NotificationsSubscriberService>,
    pub notifications_service: Arc<dyn NotificationsService>,
}

pub struct ApplicationStateToClose {
    pub db_client: Client,
    pub broker: Arc<RabbitmqMessageBroker>,
    pub subscriber_service: Arc<dyn NotificationsSubscriberService>,
    pub tasks_close_notify: Arc<Notify>,
    pub sweeper_handle: JoinHandle<()>,
    pub heartbeat_handle: JoinHandle<()>,
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(ApplicationState, ApplicationStateToClose)> {
    tracing::info!("connecting to database");
    let db_client_options = ClientOptions::parse(&env.db_connection_string).await?;
    let db_client = Client::with_options(db_client_options)?;
    let db = db_client.database(&env.db_name);

    tracing::info!("creating repositories");
    let notifications_repository = Arc::new(NotificationsRepositoryImpl::new(db.clone()).await?);
    let devices_repository = Arc::new(DevicesRepositoryImpl::new(db).await?);

    tracing::info!("connecting to rabbitmq");
    let config = RabbitmqMessageBrokerConfig {
        exchange_name: env.rabbitmq_exchange_name.clone(),
    };
    let open_connection_args =
        OpenConnectionArguments::try_from(env.rabbitmq_connection_string.as_str())?;
    let broker = Arc::new(RabbitmqMessageBroker::new(config, open_connection_args).await?);

    tracing::info!("creating services");
    let config = DevicePresenceServiceConfig {
        offline_timeout: env.device_offline_timeout,
        sweep_interval: env.presence_sweep_interval,
        heartbeat_interval: env.heartbeat_interval,
        ip_address: env.client_ip_address.clone(),
        hostname: env.client_hostname.clone(),
    };
    let presence_service = Arc::new(DevicePresenceServiceImpl::new(
        config.clone(),
        devices_repository,
    ));
    let device_id = presence_service.device_id();

    let tasks_close_notify = Arc::new(Notify::new());
    let sweeper = DevicePresenceSweeper::new(&config, presence_service.clone());
    let sweeper_handle = tokio::spawn(sweeper.run(tasks_close_notify.clone()));
    let heartbeat_task = DeviceHeartbeatTask::new(&config, presence_service.clone());
    let heartbeat_handle = tokio::spawn(heartbeat_task.run(tasks_close_notify.clone()));

    let notifications_service = Arc::new(NotificationsServiceImpl::new(
        notifications_repository.clone(),
    ));

    let publisher_service = Arc::new(NotificationsPublisherServiceImpl::new(
        device_id,
        notifications_repository,
        broker.clone() as Arc<dyn MessageBroker>,
    ));

    let subscriber_service = Arc::new(NotificationsSubscriberServiceImpl::new(
        device_id,
        broker.clone() as Arc<dyn MessageBroker>,
    ));
    subscriber_service.initialize().await;

    Ok((
        ApplicationState {
            presence_service,
            publisher_service,
            subscriber_service: subscriber_service.clone(),
            notifications_service,
        },
        ApplicationStateToClose {
            db_client,
            broker,
            subscriber_service,
            tasks_close_notify,
            sweeper_handle,
            heartbeat_handle,
        },
    ))
}
