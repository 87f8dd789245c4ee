use super::patterns::{match_free_hours, match_locker_name, match_pickup_code, match_timestamp};
use super::{ParcelBuilder, ParcelRecord, Parser};
use chrono::{Datelike, Local};
use tracing::{debug, trace};

/// Line-oriented parser for locker pickup notifications
///
/// A timestamp line (`3月15日 10:30`) always starts a new record. Lines
/// after it feed that record until the next timestamp line or end of input:
/// `【name】` sets the locker, `取件码<digits>` the pickup code and
/// `<digits>小时` the free hours. Later matches overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct NotificationParser {
    /// Fixed year for arrivals; `None` means the current local year
    year: Option<i32>,
}

/// Accumulator state threaded through the lines
enum State {
    Idle,
    Accumulating(ParcelBuilder),
}

impl NotificationParser {
    pub fn new() -> Self {
        Self { year: None }
    }

    /// Parser that stamps every arrival with `year`
    pub fn for_year(year: i32) -> Self {
        Self { year: Some(year) }
    }

    fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year())
    }

    /// Advance the state machine by one non-blank line
    fn step(state: State, line: &str, year: i32, records: &mut Vec<ParcelRecord>) -> State {
        let arrival = match_timestamp(line).and_then(|ts| {
            let resolved = ts.resolve(year);
            if resolved.is_none() {
                debug!(?ts, year, "timestamp outside representable range");
            }
            resolved
        });

        let mut current = match (state, arrival) {
            (State::Accumulating(previous), Some(arrival)) => {
                records.push(previous.build());
                ParcelBuilder::new(arrival)
            }
            (State::Idle, Some(arrival)) => ParcelBuilder::new(arrival),
            (State::Accumulating(current), None) => current,
            (State::Idle, None) => {
                trace!(line, "discarding line before first timestamp");
                return State::Idle;
            }
        };

        if let Some(name) = match_locker_name(line) {
            current.set_locker_name(name);
        }
        if let Some(code) = match_pickup_code(line) {
            current.set_pickup_code(code);
        }
        if let Some(hours) = match_free_hours(line) {
            current.set_free_hours(hours);
        }
        current.push_line(line);

        State::Accumulating(current)
    }
}

impl Parser for NotificationParser {
    fn parse(&self, text: &str) -> Vec<ParcelRecord> {
        let year = self.year();
        let mut records = Vec::new();

        let state = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .fold(State::Idle, |state, line| {
                Self::step(state, line, year, &mut records)
            });

        if let State::Accumulating(last) = state {
            records.push(last.build());
        }

        debug!(count = records.len(), "parsed notification text");
        records
    }
}
