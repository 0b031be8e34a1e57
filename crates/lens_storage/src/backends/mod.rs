pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
