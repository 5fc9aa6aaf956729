use crate::model::tally::DailyTally;
use anyhow::Result;

/// The persisted "today" record. `clear` removes the record entirely,
/// which is distinct from saving a tally with zero events.
pub trait TallyRepository {
    fn get(&self) -> Result<Option<DailyTally>>;
    fn save(&self, tally: &DailyTally) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
