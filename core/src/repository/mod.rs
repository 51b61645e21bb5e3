pub mod file;
pub mod memory;
pub mod traits;
pub mod workout;

// Re-export
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
pub use workout::{Snapshot, WorkoutRepository, WORKOUTS_KEY};
