//! specsync core library — domain types, run configuration, ordering schema
//! and the field-ordering resolver.
//!
//! - [`types`] — newtypes, policies and the file mapping
//! - [`config`] — [`SyncConfig`] load / validate
//! - [`schema`] — [`Schema`] load from `order` or `cms` documents
//! - [`order`] — [`resolve_order`]
//! - [`error`] — [`ConfigError`], [`SchemaError`]

pub mod config;
pub mod error;
pub mod order;
pub mod schema;
pub mod types;

pub use config::SyncConfig;
pub use error::{ConfigError, SchemaError};
pub use order::resolve_order;
pub use schema::{OrderEntry, OrderList, Schema};
pub use types::{Envelope, FileMapping, RecordType, SchemaFormat, UnknownTypePolicy};
