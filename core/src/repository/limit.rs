use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

const LIMIT_FILE_NAME: &str = "limit.json";

/// Limit in force when the user has never configured one.
pub const DEFAULT_DAILY_LIMIT: u32 = 10;

/// The persisted daily limit. Independent of the tally and the ledger;
/// a rollover never touches it.
pub trait LimitRepository {
    fn get(&self) -> Result<u32>;
    fn set(&self, limit: u32) -> Result<()>;
}

pub struct FileLimitRepository {
    file_path: PathBuf,
}

impl FileLimitRepository {
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
        path.push(LIMIT_FILE_NAME);

        Ok(FileLimitRepository { file_path: path })
    }
}

impl LimitRepository for FileLimitRepository {
    fn get(&self) -> Result<u32> {
        if !self.file_path.exists() {
            return Ok(DEFAULT_DAILY_LIMIT);
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let limit = serde_json::from_reader(reader)
            .context("Failed to read the daily limit record")?;
        Ok(limit)
    }

    fn set(&self, limit: u32) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &limit)
            .context("Failed to write the daily limit record")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ten_when_never_configured() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileLimitRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(repo.get().unwrap(), DEFAULT_DAILY_LIMIT);
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileLimitRepository::new(Some(dir.path().to_path_buf())).unwrap();

        repo.set(7).unwrap();
        assert_eq!(repo.get().unwrap(), 7);
    }
}
