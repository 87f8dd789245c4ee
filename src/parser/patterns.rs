use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;
use std::sync::LazyLock;

// ASCII digits only; full-width digits never count as numbers here.
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})月([0-9]{1,2})日\s*([0-9]{1,2}):([0-9]{1,2})")
        .expect("timestamp pattern is valid")
});

static LOCKER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【(.+?)】").expect("locker pattern is valid"));

static PICKUP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"取件码([0-9]+)").expect("pickup code pattern is valid"));

static FREE_HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)小时").expect("free hours pattern is valid"));

/// Yearless timestamp as written in a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timestamp {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Timestamp {
    /// Place the timestamp in `year`
    ///
    /// Out-of-range components roll into the next unit (`2月30日` lands in
    /// March, `24:00` on the following day, month 0 in the previous December).
    /// Only fails when the result falls outside chrono's representable range.
    pub fn resolve(&self, year: i32) -> Option<NaiveDateTime> {
        let months = self.month as i32 - 1;
        let year = year + months.div_euclid(12);
        let month = months.rem_euclid(12) as u32 + 1;

        let start = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
        let offset = TimeDelta::days(i64::from(self.day) - 1)
            + TimeDelta::hours(i64::from(self.hour))
            + TimeDelta::minutes(i64::from(self.minute));

        start.checked_add_signed(offset)
    }
}

pub(crate) fn match_timestamp(line: &str) -> Option<Timestamp> {
    let caps = TIMESTAMP.captures(line)?;
    // Each group is at most two ASCII digits, so these parses cannot fail.
    let field = |i: usize| caps[i].parse::<u32>().ok();

    Some(Timestamp {
        month: field(1)?,
        day: field(2)?,
        hour: field(3)?,
        minute: field(4)?,
    })
}

pub(crate) fn match_locker_name(line: &str) -> Option<&str> {
    LOCKER_NAME
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub(crate) fn match_pickup_code(line: &str) -> Option<&str> {
    PICKUP_CODE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Free-hours figure on the line, if it fits in a `u32`
pub(crate) fn match_free_hours(line: &str) -> Option<u32> {
    FREE_HOURS
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
