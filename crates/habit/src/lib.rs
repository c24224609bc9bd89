mod input;
mod local;
mod memory;
mod sqlite;
mod store;

pub use input::*;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{Completion, DateRange, HabitStore};
