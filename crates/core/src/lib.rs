pub mod record;

pub use record::{ParsedRow, PortfolioRecord, TITLE_REQUIRED};
