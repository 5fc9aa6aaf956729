pub mod history;
pub mod limit;
pub mod tally;
pub mod traits;

// Re-export
pub use history::{FileHistoryRepository, HistoryRepository};
pub use limit::{FileLimitRepository, LimitRepository, DEFAULT_DAILY_LIMIT};
pub use tally::FileTallyRepository;
pub use traits::TallyRepository;
