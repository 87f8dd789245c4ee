// Public API exports
pub mod calculator;
pub mod config;
pub mod parser;
pub mod report;
pub mod settings;
pub mod store;

// Re-export main types for convenience
pub use parser::{
    parse, parse_for_year, NotificationParser, ParcelBuilder, ParcelId, ParcelRecord, Parser,
};

pub use calculator::{
    evaluate, format_duration, FreeHoursLookup, HoursMinutes, Severity, TimeStatus,
    WARNING_THRESHOLD_HOURS,
};

pub use settings::{LockerSettings, SettingsError, DEFAULT_LOCKERS};

pub use store::{ParcelStore, StoreStats};

pub use config::AppConfig;

pub use report::{format_arrival, group_by_locker, render_report, status_rows, ParcelStatusRow};
