use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::model::tally::{DailyTally, SmokeEvent};

/// One closed-out day. Immutable once created; the ledger only ever
/// deletes whole entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Creation instant in RFC 3339 form, unique within the ledger.
    pub id: String,
    /// Calendar date fixed at creation. Stored raw; the weekday label is
    /// derived at render time so history survives language changes.
    pub date: NaiveDate,
    pub smoked_count: u32,
    pub limit: u32,
    pub over_limit: u32,
    pub smoke_times: Vec<SmokeEvent>,
}

impl HistoryEntry {
    /// Snapshots a tally against the limit in force at `now`.
    pub fn close_out(tally: &DailyTally, limit: u32, now: DateTime<Local>) -> Self {
        Self {
            id: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            date: now.date_naive(),
            smoked_count: tally.smoked_count,
            limit,
            over_limit: tally.smoked_count.saturating_sub(limit),
            smoke_times: tally.smoke_times.clone(),
        }
    }
}
