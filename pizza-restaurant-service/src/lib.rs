pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod serializer;
pub mod store;
pub mod validation;

pub use handlers::{AppState, app};
pub use store::{MemoryStore, PgStore, Store, StoreError};
