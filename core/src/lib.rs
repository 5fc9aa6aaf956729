pub mod model;
pub mod repository;
pub mod service;
pub mod usecase;

pub use model::history::HistoryEntry;
pub use model::tally::{DailyTally, SmokeEvent};
pub use repository::{
    FileHistoryRepository, FileLimitRepository, FileTallyRepository, HistoryRepository,
    LimitRepository, TallyRepository, DEFAULT_DAILY_LIMIT,
};
pub use service::limit_service::LimitService;
pub use service::tally_service::TallyService;
pub use usecase::rollover::RolloverUseCase;
