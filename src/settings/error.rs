use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Locker name must not be empty")]
    EmptyName,

    #[error("Free hours for locker {name} must be at least 1 (got {hours})")]
    InvalidHours { name: String, hours: u32 },
}
