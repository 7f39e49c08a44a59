pub mod memory;

#[cfg(feature = "mongodb")]
pub mod mongo;

pub use memory::MemoryStore;

#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;
