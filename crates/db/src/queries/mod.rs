// crates/db/src/queries/mod.rs
// Typed query methods on `Database`, grouped per domain.

pub mod cycles;
pub mod games;
pub mod home;
pub mod ratings;
pub(crate) mod row_types;
pub mod sessions;
pub mod stats;
pub mod statuses;

pub use cycles::{CycleFilterParams, CyclePatch, CycleSort, FinishCycle, NewCycle};
pub use games::{GameListParams, GamePatch, GameSort, NewGame};
pub use sessions::SessionPatch;
pub use stats::StatRowParams;
