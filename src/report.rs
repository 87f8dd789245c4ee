use crate::calculator::{evaluate, FreeHoursLookup, TimeStatus};
use crate::parser::ParcelRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Shown when there are no parcels at all
pub const EMPTY_REPORT: &str = "暂无快递信息，请先导入数据";

/// Header used for parcels whose notification never named a locker
pub const UNNAMED_LOCKER: &str = "(未识别快递柜)";

/// A parcel together with its status at one instant
#[derive(Debug, Serialize)]
pub struct ParcelStatusRow<'a> {
    #[serde(flatten)]
    pub record: &'a ParcelRecord,
    pub status: TimeStatus,
}

/// Group parcels by locker name, sorted by name
///
/// Import order is kept within each group.
pub fn group_by_locker(records: &[ParcelRecord]) -> BTreeMap<&str, Vec<&ParcelRecord>> {
    let mut groups: BTreeMap<&str, Vec<&ParcelRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.locker_name()).or_default().push(record);
    }
    groups
}

/// `2025年03月15日 10:30`
pub fn format_arrival(arrival: NaiveDateTime) -> String {
    arrival.format("%Y年%m月%d日 %H:%M").to_string()
}

/// Evaluate every parcel at `now`
pub fn status_rows<'a, L>(
    records: &'a [ParcelRecord],
    lookup: &L,
    now: NaiveDateTime,
) -> Vec<ParcelStatusRow<'a>>
where
    L: FreeHoursLookup + ?Sized,
{
    records
        .iter()
        .map(|record| ParcelStatusRow {
            record,
            status: evaluate(record, lookup, now),
        })
        .collect()
}

/// Render the grouped plain-text report
pub fn render_report<L>(records: &[ParcelRecord], lookup: &L, now: NaiveDateTime) -> String
where
    L: FreeHoursLookup + ?Sized,
{
    if records.is_empty() {
        return format!("{}\n", EMPTY_REPORT);
    }

    let mut out = String::new();
    for (locker, parcels) in group_by_locker(records) {
        let header = if locker.is_empty() { UNNAMED_LOCKER } else { locker };
        let _ = writeln!(out, "== {} ==", header);
        let _ = writeln!(
            out,
            "免费存放时长：{}小时 | 共 {} 个包裹",
            lookup.free_hours(locker).unwrap_or(0),
            parcels.len()
        );

        for parcel in parcels {
            render_parcel(&mut out, parcel, &evaluate(parcel, lookup, now));
        }
        out.push('\n');
    }
    out
}

fn render_parcel(out: &mut String, parcel: &ParcelRecord, status: &TimeStatus) {
    let code = if parcel.pickup_code().is_empty() {
        "-"
    } else {
        parcel.pickup_code()
    };

    let _ = writeln!(out, "  [{}] {}", code, format_arrival(parcel.arrival()));
    let _ = writeln!(
        out,
        "    存放时长 {} | 免费时长 {}小时 | {} {} | {}",
        status.elapsed_display(),
        status.effective_free_hours,
        status.remaining_label(),
        status.remaining_display(),
        status.severity
    );
    let _ = writeln!(out, "    id: {}", parcel.id());
}
