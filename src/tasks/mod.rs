pub mod filter;
pub mod storage;
pub mod store;
pub mod types;

pub use filter::{can_reorder, matches_search, visible_tasks, visible_tasks_on, TaskFilter};
pub use store::{StoreConfig, SubscriptionId, TaskStore, DEFAULT_FILE_NAME};
pub use types::{sample_tasks, Priority, Task};
