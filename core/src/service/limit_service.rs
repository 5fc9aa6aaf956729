use anyhow::{bail, Result};

use crate::repository::limit::LimitRepository;

/// Cached daily limit plus the validation gate in front of it. Only
/// positive values reach the store; a rejected value leaves the previous
/// limit in effect.
pub struct LimitService<R: LimitRepository> {
    repo: R,
    limit: u32,
}

impl<R: LimitRepository> LimitService<R> {
    pub fn load(repo: R) -> Result<Self> {
        let limit = repo.get()?;
        Ok(Self { repo, limit })
    }

    pub fn current(&self) -> u32 {
        self.limit
    }

    pub fn set_limit(&mut self, value: u32) -> Result<()> {
        if value == 0 {
            bail!("The daily limit must be a positive number");
        }
        self.repo.set(value)?;
        self.limit = value;
        Ok(())
    }
}
