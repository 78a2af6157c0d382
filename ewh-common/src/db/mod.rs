//! Warehouse database access

pub mod init;
pub mod schema;

pub use init::*;
pub use schema::*;
