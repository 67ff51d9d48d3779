//! Store traits the HTTP layer is written against.
//!
//! The Postgres adapter implements both traits; the server tests use
//! in-memory implementations.

use crate::catalog::ColumnDescriptor;
use crate::document::{Document, FieldSet, PredicateMap};
use crate::error::AdminError;
use crate::pagination::Pagination;
use async_trait::async_trait;
use serde::Serialize;

/// Result of an INSERT, UPDATE or DELETE.
///
/// Zero affected rows is a normal outcome (e.g. an edit whose predicate
/// matched nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    pub rows_affected: u64,
}

impl MutationOutcome {
    pub fn new(rows_affected: u64) -> Self {
        Self { rows_affected }
    }

    pub fn is_noop(&self) -> bool {
        self.rows_affected == 0
    }
}

/// A stored administrator. `password_hash` is a PHC string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRecord {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub telegram_id: Option<String>,
}

/// Schema-agnostic access to the tables of one database schema.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of the visible base tables, ordered by name.
    async fn list_tables(&self) -> Result<Vec<String>, AdminError>;

    /// Columns of `table` in ordinal order; `NotFound` if the table is unknown.
    async fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, AdminError>;

    async fn count_rows(&self, table: &str) -> Result<i64, AdminError>;

    async fn fetch_documents(
        &self,
        table: &str,
        page: Pagination,
    ) -> Result<Vec<Document>, AdminError>;

    async fn create_document(
        &self,
        table: &str,
        fields: &FieldSet,
    ) -> Result<MutationOutcome, AdminError>;

    async fn edit_document(
        &self,
        table: &str,
        predicate: &PredicateMap,
        fields: &FieldSet,
    ) -> Result<MutationOutcome, AdminError>;

    async fn delete_document(
        &self,
        table: &str,
        predicate: &PredicateMap,
    ) -> Result<MutationOutcome, AdminError>;

    async fn drop_table(&self, table: &str) -> Result<(), AdminError>;
}

/// Persistence for administrator accounts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_admin(&self, username: &str) -> Result<Option<AdminRecord>, AdminError>;

    /// `Conflict` if the username is taken.
    async fn insert_admin(&self, record: &AdminRecord) -> Result<(), AdminError>;

    async fn admin_count(&self) -> Result<i64, AdminError>;
}
