pub mod arena;
pub mod console;
pub mod error;
pub mod map;
pub mod memory;
pub mod options;
pub mod session;

pub use error::MapError;
pub use map::{LongLongMap, MapStats};
pub use memory::{HeapMemory, Memory, RawMemory};
pub use options::MapOptions;

#[cfg(test)]
mod proptests;
