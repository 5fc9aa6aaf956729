use anyhow::Result;
use chrono::{DateTime, Local};

use crate::model::tally::{DailyTally, SmokeEvent};
use crate::repository::traits::TallyRepository;

/// Owns the authoritative in-memory tally for the open day. The
/// presentation layer reads snapshots through [`TallyService::tally`] and
/// issues commands; it never holds its own mutable copy.
///
/// Every successful mutation is persisted in full before it returns. If
/// the write fails, the in-memory change is rolled back so callers never
/// see a state that differs from what is on disk.
pub struct TallyService<R: TallyRepository> {
    repo: R,
    tally: DailyTally,
}

impl<R: TallyRepository> TallyService<R> {
    /// Restores the persisted tally, or starts an empty one when the
    /// record is absent.
    pub fn load(repo: R) -> Result<Self> {
        let tally = repo.get()?.unwrap_or_default();
        Ok(Self { repo, tally })
    }

    pub fn tally(&self) -> &DailyTally {
        &self.tally
    }

    pub fn add_event(&mut self, now: DateTime<Local>) -> Result<SmokeEvent> {
        let before = self.tally.clone();
        let event = self.tally.record(now).clone();
        if let Err(e) = self.repo.save(&self.tally) {
            self.tally = before;
            return Err(e);
        }
        Ok(event)
    }

    /// Removes one event by key. A missing key is a successful no-op and
    /// causes no write; the return value says whether anything changed.
    pub fn remove_event(&mut self, key: &str) -> Result<bool> {
        let before = self.tally.clone();
        if !self.tally.remove(key) {
            return Ok(false);
        }
        if let Err(e) = self.repo.save(&self.tally) {
            self.tally = before;
            return Err(e);
        }
        Ok(true)
    }

    /// Drops the in-memory state after a rollover has reported success.
    /// The persisted record is cleared by the rollover itself; calling
    /// this without that success would lose the open day.
    pub fn reset(&mut self) {
        self.tally = DailyTally::default();
    }
}
