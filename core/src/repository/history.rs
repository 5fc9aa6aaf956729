use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::model::history::HistoryEntry;

const HISTORY_FILE_NAME: &str = "history.json";

/// The persisted ledger of closed-out days, newest-first. Always read and
/// written whole; entries themselves are immutable.
pub trait HistoryRepository {
    fn load(&self) -> Result<Vec<HistoryEntry>>;
    fn save(&self, entries: &[HistoryEntry]) -> Result<()>;
}

pub struct FileHistoryRepository {
    file_path: PathBuf,
}

impl FileHistoryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(".pufftrack")
            }
        };
        fs::create_dir_all(&path)?;
        path.push(HISTORY_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<HistoryEntry>::new())?;
            writer.flush()?;
        }

        Ok(FileHistoryRepository { file_path: path })
    }
}

impl HistoryRepository for FileHistoryRepository {
    fn load(&self) -> Result<Vec<HistoryEntry>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let entries = serde_json::from_reader(reader)
            .context("Failed to read the history ledger")?;
        Ok(entries)
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)
            .context("Failed to write the history ledger")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tally::DailyTally;
    use chrono::{Local, TimeZone};

    #[test]
    fn fresh_ledger_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileHistoryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileHistoryRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let mut tally = DailyTally::default();
        tally.record(Local.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap());

        let newer = HistoryEntry::close_out(
            &tally,
            5,
            Local.with_ymd_and_hms(2025, 6, 4, 23, 0, 0).unwrap(),
        );
        let older = HistoryEntry::close_out(
            &tally,
            10,
            Local.with_ymd_and_hms(2025, 6, 3, 23, 0, 0).unwrap(),
        );

        let entries = vec![newer.clone(), older.clone()];
        repo.save(&entries).unwrap();
        assert_eq!(repo.load().unwrap(), vec![newer, older]);
    }
}
