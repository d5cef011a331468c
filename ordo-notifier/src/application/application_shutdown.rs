use super::ApplicationStateToClose;

pub async fn close(state: ApplicationStateToClose) {
    tracing::info!("stopping periodic tasks");
    state.tasks_close_notify.notify_waiters();
    // tasks cannot fail/panic
    let _ = state.sweeper_handle.await;
    let _ = state.heartbeat_handle.await;

    tracing::info!("closing subscriber");
    state.subscriber_service.close().await;

    tracing::info!("closing rabbitmq broker");
    state.broker.close().await;

    tracing::info!("closing connection with database");
    state.db_client.shutdown().await;
}
