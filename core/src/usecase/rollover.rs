use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::model::history::HistoryEntry;
use crate::model::tally::DailyTally;
use crate::repository::history::HistoryRepository;
use crate::repository::traits::TallyRepository;

/// Closes out an open day into the ledger and prunes the ledger. The
/// limit is read by the caller and passed in; a rollover never mutates it.
pub struct RolloverUseCase<'a, T: TallyRepository, H: HistoryRepository> {
    tally_repo: &'a T,
    history_repo: &'a H,
}

impl<'a, T: TallyRepository, H: HistoryRepository> RolloverUseCase<'a, T, H> {
    pub fn new(tally_repo: &'a T, history_repo: &'a H) -> Self {
        Self {
            tally_repo,
            history_repo,
        }
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.history_repo.load()
    }

    /// Snapshots the tally against `limit`, prepends the entry to the
    /// ledger, persists the ledger and clears the persisted tally record.
    ///
    /// All-or-nothing: on any failure both persisted records are left as
    /// they were (the tally clear is compensated by writing the previous
    /// ledger back), the error is returned and nothing is retried. The
    /// caller must not reset its in-memory tally unless this returns `Ok`.
    pub fn rollover(
        &self,
        tally: &DailyTally,
        limit: u32,
        now: DateTime<Local>,
    ) -> Result<HistoryEntry> {
        let previous = self.history_repo.load()?;

        let entry = HistoryEntry::close_out(tally, limit, now);
        let mut updated = Vec::with_capacity(previous.len() + 1);
        updated.push(entry.clone());
        updated.extend(previous.iter().cloned());
        self.history_repo.save(&updated)?;

        if let Err(clear_err) = self.tally_repo.clear() {
            if let Err(rollback_err) = self.history_repo.save(&previous) {
                return Err(clear_err.context(format!(
                    "Failed to clear the daily tally and the ledger rollback also failed: {rollback_err}"
                )));
            }
            return Err(clear_err.context("Failed to clear the daily tally; ledger restored"));
        }

        Ok(entry)
    }

    /// Deletes one ledger entry by id. A missing id is a no-op and causes
    /// no write. Never touches the tally or the limit.
    pub fn delete_entry(&self, id: &str) -> Result<bool> {
        let mut entries = self.history_repo.load()?;
        let Some(pos) = entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        entries.remove(pos);
        self.history_repo
            .save(&entries)
            .context("Failed to persist the ledger after deleting an entry")?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::{Cell, RefCell};

    struct MockTallyRepo {
        stored: RefCell<Option<DailyTally>>,
        fail_clear: Cell<bool>,
    }

    impl TallyRepository for MockTallyRepo {
        fn get(&self) -> Result<Option<DailyTally>> {
            Ok(self.stored.borrow().clone())
        }
        fn save(&self, tally: &DailyTally) -> Result<()> {
            *self.stored.borrow_mut() = Some(tally.clone());
            Ok(())
        }
        fn clear(&self) -> Result<()> {
            if self.fail_clear.get() {
                anyhow::bail!("permission denied");
            }
            *self.stored.borrow_mut() = None;
            Ok(())
        }
    }

    struct MockHistoryRepo {
        entries: RefCell<Vec<HistoryEntry>>,
        fail_save: Cell<bool>,
    }

    impl HistoryRepository for MockHistoryRepo {
        fn load(&self) -> Result<Vec<HistoryEntry>> {
            Ok(self.entries.borrow().clone())
        }
        fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
            if self.fail_save.get() {
                anyhow::bail!("disk full");
            }
            *self.entries.borrow_mut() = entries.to_vec();
            Ok(())
        }
    }

    fn tally_with(events: u32) -> DailyTally {
        let mut tally = DailyTally::default();
        for i in 0..events {
            tally.record(Local.with_ymd_and_hms(2025, 6, 3, 9, i, 0).unwrap());
        }
        tally
    }

    fn repos(tally: Option<DailyTally>) -> (MockTallyRepo, MockHistoryRepo) {
        (
            MockTallyRepo {
                stored: RefCell::new(tally),
                fail_clear: Cell::new(false),
            },
            MockHistoryRepo {
                entries: RefCell::new(Vec::new()),
                fail_save: Cell::new(false),
            },
        )
    }

    fn ledger_entry(id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            smoked_count: 4,
            limit: 10,
            over_limit: 0,
            smoke_times: Vec::new(),
        }
    }

    #[test]
    fn rollover_prepends_the_new_entry_and_clears_the_tally_record() {
        let tally = tally_with(6);
        let (tally_repo, history_repo) = repos(Some(tally.clone()));
        history_repo.entries.borrow_mut().push(ledger_entry("older"));

        let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
        let now = Local.with_ymd_and_hms(2025, 6, 3, 23, 55, 0).unwrap();
        let entry = usecase.rollover(&tally, 5, now).unwrap();

        assert_eq!(entry.smoked_count, 6);
        assert_eq!(entry.limit, 5);
        assert_eq!(entry.over_limit, 1);
        assert_eq!(entry.smoke_times.len(), 6);

        let ledger = history_repo.entries.borrow();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0], entry);
        assert_eq!(ledger[1].id, "older");
        assert!(tally_repo.stored.borrow().is_none());
    }

    #[test]
    fn ledger_write_failure_leaves_the_tally_record_intact() {
        let tally = tally_with(2);
        let (tally_repo, history_repo) = repos(Some(tally.clone()));
        history_repo.fail_save.set(true);

        let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
        let now = Local.with_ymd_and_hms(2025, 6, 3, 23, 55, 0).unwrap();
        assert!(usecase.rollover(&tally, 10, now).is_err());

        assert_eq!(tally_repo.stored.borrow().clone(), Some(tally));
        assert!(history_repo.entries.borrow().is_empty());
    }

    #[test]
    fn tally_clear_failure_restores_the_previous_ledger() {
        let tally = tally_with(2);
        let (tally_repo, history_repo) = repos(Some(tally.clone()));
        history_repo.entries.borrow_mut().push(ledger_entry("older"));
        tally_repo.fail_clear.set(true);

        let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
        let now = Local.with_ymd_and_hms(2025, 6, 3, 23, 55, 0).unwrap();
        assert!(usecase.rollover(&tally, 10, now).is_err());

        let ledger = history_repo.entries.borrow();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].id, "older");
        assert_eq!(tally_repo.stored.borrow().clone(), Some(tally));
    }

    #[test]
    fn delete_removes_exactly_the_matching_entry() {
        let (tally_repo, history_repo) = repos(None);
        *history_repo.entries.borrow_mut() =
            vec![ledger_entry("A"), ledger_entry("B"), ledger_entry("C")];

        let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
        assert!(usecase.delete_entry("B").unwrap());

        let ids: Vec<String> = history_repo
            .entries
            .borrow()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn delete_preserves_the_remaining_entries_untouched() {
        let (tally_repo, history_repo) = repos(None);
        let keep = ledger_entry("A");
        *history_repo.entries.borrow_mut() = vec![keep.clone(), ledger_entry("B")];

        let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
        usecase.delete_entry("B").unwrap();
        assert_eq!(history_repo.entries.borrow().clone(), vec![keep]);
    }

    #[test]
    fn delete_missing_id_is_a_noop() {
        let (tally_repo, history_repo) = repos(None);
        *history_repo.entries.borrow_mut() = vec![ledger_entry("A")];
        // A failing store would surface any unexpected write.
        history_repo.fail_save.set(true);

        let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
        assert!(!usecase.delete_entry("missing").unwrap());
        assert_eq!(history_repo.entries.borrow().len(), 1);
    }

    #[test]
    fn end_to_end_close_out_with_file_repositories() {
        use crate::repository::{FileHistoryRepository, FileTallyRepository};
        use crate::service::tally_service::TallyService;

        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();
        let tally_repo = FileTallyRepository::new(Some(base.clone())).unwrap();
        let history_repo = FileHistoryRepository::new(Some(base)).unwrap();

        let mut service = TallyService::load(tally_repo.clone()).unwrap();
        for i in 0..6 {
            service
                .add_event(Local.with_ymd_and_hms(2025, 6, 3, 9, i, 0).unwrap())
                .unwrap();
        }
        assert_eq!(service.tally().smoked_count, 6);
        assert_eq!(service.tally().over_limit(5), 1);

        let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
        let now = Local.with_ymd_and_hms(2025, 6, 3, 23, 55, 0).unwrap();
        usecase.rollover(service.tally(), 5, now).unwrap();
        service.reset();

        let ledger = usecase.history().unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].smoked_count, 6);
        assert_eq!(ledger[0].limit, 5);
        assert_eq!(ledger[0].over_limit, 1);
        assert_eq!(ledger[0].smoke_times.len(), 6);

        // The tally record is gone, not merely emptied.
        assert_eq!(tally_repo.get().unwrap(), None);
        let restored = TallyService::load(tally_repo).unwrap();
        assert!(restored.tally().is_empty());
    }

    #[test]
    fn delete_never_touches_the_tally() {
        let tally = tally_with(3);
        let (tally_repo, history_repo) = repos(Some(tally.clone()));
        *history_repo.entries.borrow_mut() = vec![ledger_entry("A")];

        let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
        usecase.delete_entry("A").unwrap();
        assert_eq!(tally_repo.stored.borrow().clone(), Some(tally));
    }
}
