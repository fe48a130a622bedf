//! Session storage — string key-value state scoped to one check-in session.

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::SessionStore;
