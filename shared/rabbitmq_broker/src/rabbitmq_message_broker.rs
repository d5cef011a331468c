use crate::{InboundMessageHandler, MessageBroker};
use amqprs::{
    callbacks::{DefaultChannelCallback, DefaultConnectionCallback},
    channel::{
        BasicAckArguments, BasicCancelArguments, BasicConsumeArguments, BasicPublishArguments,
        Channel, ExchangeDeclareArguments, ExchangeType, QueueBindArguments, QueueDeclareArguments,
    },
    connection::{Connection, OpenConnectionArguments},
    consumer::AsyncConsumer,
    BasicProperties, Deliver,
};
use anyhow::anyhow;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct RabbitmqMessageBrokerConfig {
    pub exchange_name: String,
}

///
/// [MessageBroker] backed by a RabbitMQ topic exchange.
///
/// Every subscription gets its own exclusive, auto-delete queue bound
/// to the exchange with the topic as routing key, so independently
/// running clients each receive their own copy of a message.
///
pub struct RabbitmqMessageBroker {
    exchange_name: String,
    connection: Connection,
    channel: Channel,

    /// topic -> consumer tag of the active subscription
    consumer_tags: Mutex<HashMap<String, String>>,
}

impl RabbitmqMessageBroker {
    #[tracing::instrument(
        name = "RabbitMQ Broker",
        target = "rabbitmq_broker",
        skip_all
    )]
    pub async fn new(
        config: RabbitmqMessageBrokerConfig,
        open_connection_args: OpenConnectionArguments,
    ) -> anyhow::Result<Self> {
        tracing::info!("connecting");
        let connection = Connection::open(&open_connection_args).await?;
        connection
            .register_callback(DefaultConnectionCallback)
            .await?;

        tracing::info!("opening channel");
        let channel = connection.open_channel(None).await?;
        channel.register_callback(DefaultChannelCallback).await?;

        tracing::info!("declaring exchange");
        let exchange_declare_args =
            ExchangeDeclareArguments::of_type(&config.exchange_name, ExchangeType::Topic)
                .durable(true)
                .finish();
        channel.exchange_declare(exchange_declare_args).await?;

        tracing::info!("broker ready");

        Ok(Self {
            exchange_name: config.exchange_name,
            connection,
            channel,
            consumer_tags: Mutex::new(HashMap::new()),
        })
    }

    #[tracing::instrument(
        name = "RabbitMQ Broker",
        target = "rabbitmq_broker",
        skip_all
    )]
    pub async fn close(&self) {
        tracing::info!("closing broker");

        let consumer_tags = {
            let mut consumer_tags = self.consumer_tags.lock().await;
            std::mem::take(&mut *consumer_tags)
        };
        for (topic, consumer_tag) in consumer_tags {
            let args = BasicCancelArguments::new(&consumer_tag);
            if let Err(err) = self.channel.basic_cancel(args).await {
                tracing::warn!(%err, topic, "failed to cancel consumer");
            }
        }

        if let Err(err) = self.channel.clone().close().await {
            tracing::warn!(%err, "closing channel failed");
        }
        if let Err(err) = self.connection.clone().close().await {
            tracing::warn!(%err, "closing connection failed");
        }

        tracing::info!("broker closed");
    }
}

#[async_trait]
impl MessageBroker for RabbitmqMessageBroker {
    async fn publish(&self, topic: String, payload: Vec<u8>) -> anyhow::Result<()> {
        let basic_properties = BasicProperties::default().with_persistence(true).finish();
        let args = BasicPublishArguments::new(&self.exchange_name, &topic);

        self.channel
            .basic_publish(basic_properties, payload, args)
            .await
            .map_err(|err| anyhow!("failed to publish on topic {topic}: {err}"))?;

        Ok(())
    }

    async fn subscribe(
        &self,
        topic: String,
        handler: Arc<dyn InboundMessageHandler>,
    ) -> anyhow::Result<()> {
        let queue = format!("{}.{}", topic, Uuid::new_v4());
        let queue_declare_args = QueueDeclareArguments::new(&queue)
            .durable(false)
            .exclusive(true)
            .auto_delete(true)
            .finish();
        let Some((queue, _, _)) = self
            .channel
            .queue_declare(queue_declare_args)
            .await
            .map_err(|err| anyhow!("failed to declare queue: {err}"))?
        else {
            anyhow::bail!("queue declaration returned no queue name");
        };

        let queue_bind_args = QueueBindArguments::new(&queue, &self.exchange_name, &topic);
        self.channel
            .queue_bind(queue_bind_args)
            .await
            .map_err(|err| anyhow!("failed to bind queue: {err}"))?;

        let basic_consume_args = BasicConsumeArguments::new(&queue, "")
            .manual_ack(true)
            .exclusive(true)
            .finish();
        let consumer = HandlerConsumer {
            topic: topic.clone(),
            handler,
        };
        let consumer_tag = self
            .channel
            .basic_consume(consumer, basic_consume_args)
            .await
            .map_err(|err| anyhow!("failed to consume: {err}"))?;

        self.consumer_tags.lock().await.insert(topic, consumer_tag);

        Ok(())
    }

    async fn unsubscribe(&self, topic: String) -> anyhow::Result<()> {
        let Some(consumer_tag) = self.consumer_tags.lock().await.remove(&topic) else {
            tracing::warn!(topic, "no active subscription to cancel");
            return Ok(());
        };

        let args = BasicCancelArguments::new(&consumer_tag);
        self.channel
            .basic_cancel(args)
            .await
            .map_err(|err| anyhow!("failed to cancel consumer: {err}"))?;

        Ok(())
    }
}

#[derive(Clone)]
struct HandlerConsumer {
    topic: String,
    handler: Arc<dyn InboundMessageHandler>,
}

#[async_trait]
impl AsyncConsumer for HandlerConsumer {
    #[tracing::instrument(
        name = "RabbitMQ Broker Consumer",
        target = "rabbitmq_broker",
        skip_all,
        fields(
            topic = self.topic,
            delivery_tag = deliver.delivery_tag(),
        )
    )]
    async fn consume(
        &mut self,
        channel: &Channel,
        deliver: Deliver,
        _basic_properties: BasicProperties,
        content: Vec<u8>,
    ) {
        self.handler.handle(&self.topic, &content).await;

        // handlers never fail, the message is always consumed
        let args = BasicAckArguments::new(deliver.delivery_tag(), false);
        if let Err(err) = channel.basic_ack(args).await {
            tracing::warn!(%err, "failed to ack message");
        }
    }
}
