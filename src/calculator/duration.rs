use serde::Serialize;
use std::fmt;

/// Whole hours and minutes of an unsigned duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HoursMinutes {
    pub hours: u64,
    pub minutes: u32,
}

impl HoursMinutes {
    /// Split `|hours|` into whole hours and rounded minutes
    ///
    /// Minutes that round up to 60 carry into the hour. Non-finite input
    /// yields zero.
    pub fn from_hours(hours: f64) -> Self {
        if !hours.is_finite() {
            return Self::default();
        }

        let abs = hours.abs();
        let mut whole = abs.floor();
        let mut minutes = ((abs - whole) * 60.0).round();
        if minutes >= 60.0 {
            whole += 1.0;
            minutes = 0.0;
        }

        Self {
            hours: whole as u64,
            minutes: minutes as u32,
        }
    }
}

impl fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}小时{}分钟", self.hours, self.minutes)
    }
}

/// Format an hour count as `X小时Y分钟`, dropping the sign
pub fn format_duration(hours: f64) -> String {
    HoursMinutes::from_hours(hours).to_string()
}
