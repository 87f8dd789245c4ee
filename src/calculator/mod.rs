mod duration;
mod status;


pub use duration::{format_duration, HoursMinutes};
pub use status::{Severity, TimeStatus};

use crate::parser::ParcelRecord;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Remaining hours below which a parcel is flagged as about to expire
pub const WARNING_THRESHOLD_HOURS: f64 = 2.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Read-only view of configured free hours per locker
pub trait FreeHoursLookup {
    /// Free hours for `locker_name`, or `None` if it is not configured
    fn free_hours(&self, locker_name: &str) -> Option<u32>;
}

impl<S: BuildHasher> FreeHoursLookup for HashMap<String, u32, S> {
    fn free_hours(&self, locker_name: &str) -> Option<u32> {
        self.get(locker_name).copied()
    }
}

impl FreeHoursLookup for BTreeMap<String, u32> {
    fn free_hours(&self, locker_name: &str) -> Option<u32> {
        self.get(locker_name).copied()
    }
}

/// Derive a parcel's time status at `now`
///
/// Pure: the same record, lookup and instant always give the same status.
/// A stated override of zero counts as no override and falls through to
/// the locker's configured hours.
pub fn evaluate<L>(record: &ParcelRecord, lookup: &L, now: NaiveDateTime) -> TimeStatus
where
    L: FreeHoursLookup + ?Sized,
{
    let elapsed_hours = (now - record.arrival()).num_milliseconds() as f64 / MILLIS_PER_HOUR;

    let effective_free_hours = record
        .free_hours_override()
        .filter(|&hours| hours > 0)
        .or_else(|| lookup.free_hours(record.locker_name()))
        .unwrap_or(0);

    TimeStatus::new(elapsed_hours, effective_free_hours)
}
