// crates/core/src/lib.rs
pub mod dashboard;
pub mod format;
pub mod paths;
pub mod rating;
pub mod types;

pub use dashboard::*;
pub use format::*;
pub use rating::*;
pub use types::*;
