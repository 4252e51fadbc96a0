pub mod aggregate;
pub mod types;

pub use aggregate::{assemble, build_report};
pub use types::*;
