use time::OffsetDateTime;
use uuid::Uuid;

///
/// Result of registering this client process.
///
/// `previous_last_seen` is the registering *user's* most recent
/// session timestamp across any device, captured before the
/// registration overwrote anything. `None` means first login ever,
/// in which case there is nothing to catch up on.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredDevice {
    pub device_id: Uuid,
    pub previous_last_seen: Option<OffsetDateTime>,
}
