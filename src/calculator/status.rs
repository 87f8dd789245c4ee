use super::{format_duration, WARNING_THRESHOLD_HOURS};
use serde::Serialize;
use std::fmt;

/// Display tier for a parcel's storage window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Comfortably inside the free window
    Normal,
    /// Less than two hours of free storage left
    Warning,
    /// Free window exceeded
    Overdue,
}

impl Severity {
    /// Status line shown next to a parcel
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Normal => "✅ 正常",
            Self::Warning => "⏰ 即将超时",
            Self::Overdue => "⚠️ 已超时",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time-based status of one parcel at one instant. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeStatus {
    /// Hours since arrival; negative if the arrival lies in the future
    pub elapsed_hours: f64,
    /// Override, configured locker hours, or zero
    pub effective_free_hours: u32,
    /// Negative once overdue
    pub remaining_hours: f64,
    pub is_overdue: bool,
    pub severity: Severity,
}

impl TimeStatus {
    pub(crate) fn new(elapsed_hours: f64, effective_free_hours: u32) -> Self {
        let free = f64::from(effective_free_hours);
        let remaining_hours = free - elapsed_hours;
        let is_overdue = elapsed_hours > free;

        let severity = if is_overdue {
            Severity::Overdue
        } else if remaining_hours < WARNING_THRESHOLD_HOURS {
            Severity::Warning
        } else {
            Severity::Normal
        };

        Self {
            elapsed_hours,
            effective_free_hours,
            remaining_hours,
            is_overdue,
            severity,
        }
    }

    /// Label for the remaining column: time left, or time over
    pub const fn remaining_label(&self) -> &'static str {
        if self.is_overdue {
            "已超时"
        } else {
            "剩余时间"
        }
    }

    /// Formatted elapsed storage time
    pub fn elapsed_display(&self) -> String {
        format_duration(self.elapsed_hours)
    }

    /// Formatted remaining (or overdue) time, always unsigned
    pub fn remaining_display(&self) -> String {
        format_duration(self.remaining_hours)
    }
}
