mod error;

pub use error::SettingsError;

use crate::calculator::FreeHoursLookup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lockers known out of the box, with their free storage hours
pub const DEFAULT_LOCKERS: [(&str, u32); 3] = [("丰巢", 18), ("蜜罐", 72), ("和驿智能柜", 24)];

/// Locker name to free storage hours, kept sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockerSettings {
    lockers: BTreeMap<String, u32>,
}

impl LockerSettings {
    /// Empty settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings seeded with the built-in lockers
    pub fn with_defaults() -> Self {
        let lockers = DEFAULT_LOCKERS
            .iter()
            .map(|(name, hours)| (name.to_string(), *hours))
            .collect();
        Self { lockers }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.lockers.get(name).copied()
    }

    /// Add or replace a locker's free hours
    pub fn set(&mut self, name: &str, hours: u32) -> Result<(), SettingsError> {
        let name = validate_entry(name, hours)?;
        self.lockers.insert(name, hours);
        Ok(())
    }

    /// Remove a locker, returning its hours if it existed
    pub fn remove(&mut self, name: &str) -> Option<u32> {
        self.lockers.remove(name.trim())
    }

    /// Iterate lockers in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.lockers.iter().map(|(name, hours)| (name.as_str(), *hours))
    }

    pub fn len(&self) -> usize {
        self.lockers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lockers.is_empty()
    }
}

impl FreeHoursLookup for LockerSettings {
    fn free_hours(&self, locker_name: &str) -> Option<u32> {
        self.get(locker_name)
    }
}

impl FromIterator<(String, u32)> for LockerSettings {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            lockers: iter.into_iter().collect(),
        }
    }
}

/// Check a locker entry, returning the trimmed name
pub fn validate_entry(name: &str, hours: u32) -> Result<String, SettingsError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SettingsError::EmptyName);
    }
    if hours < 1 {
        return Err(SettingsError::InvalidHours {
            name: name.to_string(),
            hours,
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LockerSettings::with_defaults();
        assert_eq!(settings.len(), 3);
        assert_eq!(settings.get("丰巢"), Some(18));
        assert_eq!(settings.get("蜜罐"), Some(72));
        assert_eq!(settings.get("和驿智能柜"), Some(24));
        assert_eq!(settings.get("菜鸟驿站"), None);
    }

    #[test]
    fn test_set_trims_and_overwrites() {
        let mut settings = LockerSettings::new();
        settings.set("  丰巢 ", 12).unwrap();
        settings.set("丰巢", 18).unwrap();

        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get("丰巢"), Some(18));
    }

    #[test]
    fn test_set_rejects_invalid_entries() {
        let mut settings = LockerSettings::new();

        assert_eq!(settings.set("   ", 10), Err(SettingsError::EmptyName));
        assert_eq!(
            settings.set("丰巢", 0),
            Err(SettingsError::InvalidHours {
                name: "丰巢".to_string(),
                hours: 0
            })
        );
        assert!(settings.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut settings = LockerSettings::with_defaults();
        assert_eq!(settings.remove("蜜罐"), Some(72));
        assert_eq!(settings.remove("蜜罐"), None);
        assert_eq!(settings.len(), 2);
    }

    #[test]
    fn test_iter_is_sorted_by_name() {
        let settings: LockerSettings = [("b".to_string(), 2_u32), ("a".to_string(), 1_u32)]
            .into_iter()
            .collect();
        let names: Vec<_> = settings.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut settings = LockerSettings::new();
        settings.set("丰巢", 18).unwrap();
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"丰巢":18}"#);
    }
}
