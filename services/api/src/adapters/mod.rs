pub mod db;
pub mod json_file;
pub mod memory;

pub use db::DbAdapter;
pub use json_file::JsonFileAdapter;
pub use memory::MemoryAdapter;
