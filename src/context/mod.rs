pub mod manager;

pub use manager::{ContextData, ContextManager, MemoryEntry};
