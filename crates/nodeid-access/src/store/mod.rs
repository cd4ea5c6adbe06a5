//! Node id store implementations.
//!
//! - **Memory**: process-local, for tests and embedded use.
//! - **File**: JSON record on disk, first writer wins.

pub mod file;
pub mod memory;

pub use file::{FileNodeIdStore, NodeIdRecord};
pub use memory::MemoryNodeIdStore;
