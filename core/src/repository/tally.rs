use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::model::tally::DailyTally;
use crate::repository::traits::TallyRepository;

const TALLY_FILE_NAME: &str = "daily.json";

#[derive(Clone)]
pub struct FileTallyRepository {
    file_path: PathBuf,
}

impl FileTallyRepository {
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
        path.push(TALLY_FILE_NAME);

        // The file is NOT created up front: an absent record means "no open
        // day", which a rollover relies on being distinguishable from an
        // empty tally.
        Ok(FileTallyRepository { file_path: path })
    }
}

impl TallyRepository for FileTallyRepository {
    fn get(&self) -> Result<Option<DailyTally>> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let tally = serde_json::from_reader(reader)
            .context("Failed to read the daily tally record")?;
        Ok(Some(tally))
    }

    fn save(&self, tally: &DailyTally) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tally)
            .context("Failed to write the daily tally record")?;
        writer.flush()?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)
                .context("Failed to clear the daily tally record")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn absent_record_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTallyRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(repo.get().unwrap(), None);
    }

    #[test]
    fn save_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTallyRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let mut tally = DailyTally::default();
        tally.record(Local.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap());
        repo.save(&tally).unwrap();

        assert_eq!(repo.get().unwrap(), Some(tally));
    }

    #[test]
    fn clear_removes_the_record_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTallyRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let mut tally = DailyTally::default();
        tally.record(Local.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap());
        repo.save(&tally).unwrap();

        repo.clear().unwrap();
        assert_eq!(repo.get().unwrap(), None);
        // Clearing an already-absent record stays a no-op.
        repo.clear().unwrap();
    }
}
