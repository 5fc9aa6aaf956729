use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SmokeEvent {
    /// Creation instant in RFC 3339 form. Unique within a tally.
    pub key: String,
    /// Wall-clock time of day, formatted once at creation.
    pub time: String,
}

/// The mutable "today" state: a running count plus the event list,
/// newest-first. The count always equals the list length, and
/// `last_smoke_timestamp` is `None` exactly when the list is empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DailyTally {
    pub smoked_count: u32,
    pub smoke_times: Vec<SmokeEvent>,
    pub last_smoke_timestamp: Option<DateTime<Utc>>,
}

impl DailyTally {
    /// Records one event at `now`. The display time is computed here and
    /// never recomputed later. There is no upper bound; going past the
    /// daily limit is surfaced as a derived value, never blocked.
    pub fn record(&mut self, now: DateTime<Local>) -> &SmokeEvent {
        let event = SmokeEvent {
            key: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            time: now.format("%H:%M").to_string(),
        };
        self.smoke_times.insert(0, event);
        self.smoked_count += 1;
        self.last_smoke_timestamp = Some(now.with_timezone(&Utc));
        &self.smoke_times[0]
    }

    /// Removes the event with the given key. A missing key is a no-op,
    /// not an error; the return value says whether anything changed.
    /// Removal never reorders, so the list stays newest-first and the
    /// new first element is the most recent remaining event.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(pos) = self.smoke_times.iter().position(|e| e.key == key) else {
            return false;
        };
        self.smoke_times.remove(pos);
        self.smoked_count = self.smoke_times.len() as u32;
        self.last_smoke_timestamp = self.smoke_times.first().and_then(instant_of);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.smoke_times.is_empty()
    }

    /// How far past the limit today is. Zero while at or under it.
    pub fn over_limit(&self, limit: u32) -> u32 {
        self.smoked_count.saturating_sub(limit)
    }

    /// Events left before the limit is reached. Negative once over it.
    pub fn remaining(&self, limit: u32) -> i64 {
        limit as i64 - self.smoked_count as i64
    }

    /// Display-only elapsed time since the last event, computed at read
    /// time. Nothing about it is persisted.
    pub fn seconds_since_last(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_smoke_timestamp
            .map(|last| (now - last).num_seconds().max(0))
    }
}

fn instant_of(event: &SmokeEvent) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&event.key)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
