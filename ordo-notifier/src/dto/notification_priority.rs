use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPriority {
    Low,
    /// Older producers still emit "MEDIUM"
    #[serde(alias = "MEDIUM")]
    #[strum(to_string = "NORMAL", serialize = "MEDIUM")]
    Normal,
    High,
    Urgent,
}
