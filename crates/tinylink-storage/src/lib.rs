//! Durable store adapters for links.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::{MySqlRepository, MySqlSettings};
pub use tinylink_core::{Repository, StorageError};
