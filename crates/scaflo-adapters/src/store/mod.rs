//! Store repository adapters.

mod json_file;
mod memory;

pub use json_file::JsonStoreFile;
pub use memory::MemoryStoreRepository;
