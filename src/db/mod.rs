//! Database access layer using SQLx with SQLite.
//!
//! Provides connection pooling, migrations, and the Inventory Store.

pub mod migrate;
pub mod pool;
pub mod store;

pub use migrate::*;
pub use pool::*;
pub use store::Store;
