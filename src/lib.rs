//! Task-tracking core: a file-backed task store plus the pure filter/sort
//! policy a presentation layer renders from.
//!
//! The store owns the canonical list and rewrites its JSON file after every
//! mutation; subscribers are notified with the new list so UI layers can
//! re-render. Filtering, searching, and display ordering never touch the
//! store; they are projections computed by [`tasks::filter`].

pub mod logging;
pub mod shared;
pub mod tasks;

pub use tasks::filter::{can_reorder, matches_search, visible_tasks, TaskFilter};
pub use tasks::store::{StoreConfig, SubscriptionId, TaskStore};
pub use tasks::types::{Priority, Task};
