mod message_broker;
mod rabbitmq_message_broker;

pub use message_broker::{InboundMessageHandler, MessageBroker};
pub use rabbitmq_message_broker::{RabbitmqMessageBroker, RabbitmqMessageBrokerConfig};
