pub mod limit_service;
pub mod tally_service;
