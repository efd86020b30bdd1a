//! SQLite adapters: connection pooling, migrations, and store
//! implementations.

pub mod connection;
pub mod migrations;
pub mod mission_store;
pub mod step_store;

pub use connection::{create_pool, create_test_pool, ConnectionError, PoolConfig};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use mission_store::SqliteMissionStore;
pub use step_store::SqliteStepStore;
