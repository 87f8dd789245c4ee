use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier assigned to a parcel when it is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParcelId(Uuid);

impl ParcelId {
    /// Create a new random parcel ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a parcel ID from its string form
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ParcelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parcel recovered from notification text
///
/// Immutable once built: fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParcelRecord {
    id: ParcelId,
    arrival: NaiveDateTime,
    locker_name: String,
    pickup_code: String,
    free_hours_override: Option<u32>,
    raw_text: String,
}

impl ParcelRecord {
    /// Rebuild a record from previously stored parts
    pub fn restore(
        id: ParcelId,
        arrival: NaiveDateTime,
        locker_name: impl Into<String>,
        pickup_code: impl Into<String>,
        free_hours_override: Option<u32>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            arrival,
            locker_name: locker_name.into(),
            pickup_code: pickup_code.into(),
            free_hours_override,
            raw_text: raw_text.into(),
        }
    }

    pub fn id(&self) -> ParcelId {
        self.id
    }

    /// Local wall-clock time the parcel was stored
    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    /// Locker name, empty if the block never named one
    pub fn locker_name(&self) -> &str {
        &self.locker_name
    }

    /// Pickup code, empty if the block never carried one
    pub fn pickup_code(&self) -> &str {
        &self.pickup_code
    }

    /// Free hours stated in the notification itself
    pub fn free_hours_override(&self) -> Option<u32> {
        self.free_hours_override
    }

    /// Lines this record was built from, for display only
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

/// Mutable builder used while a record block is still being read
#[derive(Debug, Clone)]
pub struct ParcelBuilder {
    arrival: NaiveDateTime,
    locker_name: String,
    pickup_code: String,
    free_hours_override: Option<u32>,
    lines: Vec<String>,
}

impl ParcelBuilder {
    /// Open a new record at the given arrival time
    pub fn new(arrival: NaiveDateTime) -> Self {
        Self {
            arrival,
            locker_name: String::new(),
            pickup_code: String::new(),
            free_hours_override: None,
            lines: Vec::new(),
        }
    }

    pub fn set_locker_name(&mut self, name: &str) {
        self.locker_name = name.to_string();
    }

    pub fn set_pickup_code(&mut self, code: &str) {
        self.pickup_code = code.to_string();
    }

    pub fn set_free_hours(&mut self, hours: u32) {
        self.free_hours_override = Some(hours);
    }

    /// Append a source line to the record's raw text
    pub fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Finalize into an immutable record with a fresh ID
    pub fn build(self) -> ParcelRecord {
        ParcelRecord {
            id: ParcelId::new(),
            arrival: self.arrival,
            locker_name: self.locker_name,
            pickup_code: self.pickup_code,
            free_hours_override: self.free_hours_override,
            raw_text: self.lines.join("\n"),
        }
    }
}
