//! Ordering and lifecycle rules for throwlist tasks.
//!
//! Everything in this crate is pure: it classifies task snapshots into views,
//! issues position keys, and computes the field deltas of user actions.
//! Persistence lives behind the store trait of `throwlist-app`.

/// Calendar dates without time of day.
pub mod date;
/// Domain error types.
pub mod error;
/// Identifier types.
pub mod id;
/// Field deltas of user actions.
pub mod lifecycle;
/// Band and sorter position keys.
pub mod ordering;
/// Today / Future / Removed classification.
pub mod partition;
/// Bulk-action selection.
pub mod selection;
/// Task records and normalization.
pub mod task;

pub use date::DateOnly;
pub use error::{DateError, ValidationError};
pub use id::TaskId;
pub use lifecycle::{NewTask, TaskPatch, TaskUpdate, ThrowAction, ThrowOffset};
pub use ordering::{Placement, SORTER_STEP};
pub use partition::{Board, View};
pub use selection::Selection;
pub use task::{Band, StoredTask, Task};
