pub mod history;
pub mod tally;
