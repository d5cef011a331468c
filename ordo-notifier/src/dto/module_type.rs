use serde::{Deserialize, Serialize};

///
/// Department clients known to the suite. Every module runs as its own
/// client process and owns its own notification channel.
///
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleType {
    Sales,
    Projects,
    Pricing,
    Storage,
    Maintenance,
}
