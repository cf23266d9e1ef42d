//! Persistence layer — async `Store` trait with an in-memory backend.

pub mod memory;
pub mod seed;
pub mod traits;

pub use memory::MemoryStore;
pub use seed::seed_defaults;
pub use traits::Store;
