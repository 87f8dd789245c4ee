mod notification;
mod patterns;
mod record;


pub use notification::NotificationParser;
pub use record::{ParcelBuilder, ParcelId, ParcelRecord};

/// Core trait for turning pasted notification text into parcel records
pub trait Parser: Send + Sync {
    /// Parse a block of free text into parcel records
    ///
    /// # Arguments
    /// * `text` - Raw notification text, usually several messages pasted together
    ///
    /// # Returns
    /// Records in the order their timestamp lines appear. Unmatched input
    /// yields an empty vector.
    fn parse(&self, text: &str) -> Vec<ParcelRecord>;
}

/// Parse notification text, stamping arrivals with the current local year
pub fn parse(text: &str) -> Vec<ParcelRecord> {
    NotificationParser::new().parse(text)
}

/// Parse notification text, stamping arrivals with a fixed year
pub fn parse_for_year(text: &str, year: i32) -> Vec<ParcelRecord> {
    NotificationParser::for_year(year).parse(text)
}
