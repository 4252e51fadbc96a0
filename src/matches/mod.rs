pub mod store;
pub mod types;

pub use store::{parse_extract, MatchStore};
pub use types::*;

// Module-level constants
pub const TARGET_MATCH: &str = "match_store";
