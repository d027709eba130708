//! Record store implementations

pub mod in_memory;
#[cfg(feature = "mysql")]
pub mod mysql;

pub use in_memory::InMemoryRecordStore;
#[cfg(feature = "mysql")]
pub use mysql::MysqlRecordStore;
