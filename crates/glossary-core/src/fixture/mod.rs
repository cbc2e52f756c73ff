pub mod file;
pub mod result;
pub mod status;

pub use file::{FixtureFile, Row};
pub use result::{FixtureResult, LoadStats, LoadSummary, SummaryStats};
pub use status::FixtureLoadStatus;
