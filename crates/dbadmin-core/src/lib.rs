//! # dbadmin-core
//!
//! Schema-agnostic document access for the dbadmin server.
//!
//! This crate owns everything that can be reasoned about without a live
//! database connection:
//! - the tagged [`ScalarValue`] and the ordered [`Document`] built from it
//! - catalog descriptors and identifier validation ([`catalog`])
//! - the pure statement builders ([`query`])
//! - the row marshaler that zips result columns into documents ([`marshal`])
//! - the store traits the HTTP layer is written against ([`store`])
//! - configuration shared by the adapter and server crates ([`config`])
//!
//! Statements produced here carry every user value as a bound parameter.
//! Identifiers are only ever taken from a [`TableSchema`], which in turn only
//! comes out of catalog metadata.

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod marshal;
pub mod pagination;
pub mod query;
pub mod store;
pub mod value;

pub use catalog::{ColumnDescriptor, TableSchema, ensure_known_table, quote_ident};
pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
pub use document::{Document, FieldSet, PredicateMap, to_field_set};
pub use error::AdminError;
pub use marshal::{RawRow, to_documents};
pub use pagination::Pagination;
pub use query::Statement;
pub use store::{AdminRecord, CredentialStore, DocumentStore, MutationOutcome};
pub use value::ScalarValue;
