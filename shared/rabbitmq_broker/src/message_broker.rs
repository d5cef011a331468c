use async_trait::async_trait;
use std::sync::Arc;

///
/// Topic based publish/subscribe transport.
///
/// Topics are plain names agreed on by independently deployed
/// clients, payloads are opaque bytes.
///
#[async_trait]
pub trait MessageBroker: Send + Sync {
    ///
    /// Publish payload on a single topic.
    ///
    async fn publish(&self, topic: String, payload: Vec<u8>) -> anyhow::Result<()>;

    ///
    /// Subscribe handler to a topic.
    ///
    /// Subscribing the same topic twice creates two independent
    /// subscriptions. Deduplication is the caller's responsibility.
    ///
    async fn subscribe(
        &self,
        topic: String,
        handler: Arc<dyn InboundMessageHandler>,
    ) -> anyhow::Result<()>;

    ///
    /// Cancel the subscription of a topic.
    ///
    /// Messages published after this call returns are no longer delivered.
    ///
    async fn unsubscribe(&self, topic: String) -> anyhow::Result<()>;
}

///
/// Callback invoked for every payload delivered on a subscribed topic.
///
/// Runs on the broker's delivery task. Implementations must not
/// block it for longer than handling the message takes.
///
#[async_trait]
pub trait InboundMessageHandler: Send + Sync {
    async fn handle(&self, topic: &str, payload: &[u8]);
}
