use crate::dto::NotificationMessage;

///
/// In-process fan-out callback registered by the UI layer.
///
/// Invoked on the broker's delivery task; a listener that needs a
/// specific thread (e.g. a UI thread) must marshal there itself.
///
pub trait NotificationListener: Send + Sync {
    fn on_notification(&self, notification: &NotificationMessage);
}
