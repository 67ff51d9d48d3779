//! PostgreSQL backend for dbadmin.
//!
//! [`PgDocumentStore`] resolves every table name through the
//! [`SchemaInspector`], builds statements with `dbadmin_core::query` and binds
//! their parameters positionally. [`PgCredentialStore`] keeps administrator
//! accounts in a table of the same database.

use async_trait::async_trait;
use dbadmin_core::query::{build_delete, build_drop, build_insert, build_select, build_update};
use dbadmin_core::{
    AdminError, ColumnDescriptor, DatabaseConfig, Document, DocumentStore, FieldSet,
    MutationOutcome, Pagination, PredicateMap, ScalarValue, Statement, to_documents,
};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::{Arguments, PgPool};
use std::time::Duration;
use tracing::{debug, info};

pub mod credentials;
pub mod error;
pub mod introspect;
pub mod marshal;

pub use credentials::PgCredentialStore;
pub use introspect::SchemaInspector;
pub use marshal::PgDocumentRow;

fn args_add<T>(args: &mut PgArguments, v: T) -> Result<(), AdminError>
where
    T: Send + Sync + 'static,
    for<'q> T: sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    args.add(v)
        .map_err(|e| AdminError::InvalidArgument(format!("unable to bind parameter: {e}")))
}

/// Bind statement parameters in order. The statement text casts each
/// placeholder to its column type where needed.
fn bind_params(params: &[ScalarValue]) -> Result<PgArguments, AdminError> {
    let mut args = PgArguments::default();
    for param in params {
        match param {
            ScalarValue::Null => args_add(&mut args, Option::<String>::None)?,
            ScalarValue::Bool(b) => args_add(&mut args, *b)?,
            ScalarValue::Int(i) => args_add(&mut args, *i)?,
            ScalarValue::Float(f) => args_add(&mut args, *f)?,
            ScalarValue::Text(s) => args_add(&mut args, s.clone())?,
            ScalarValue::Bytes(b) => args_add(&mut args, b.clone())?,
        }
    }
    Ok(args)
}

/// Open a connection pool for `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, AdminError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.connection_string())
        .await
        .map_err(error::summarize)
}

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    inspector: SchemaInspector,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        let inspector = SchemaInspector::new(pool.clone(), config);
        Self { pool, inspector }
    }

    async fn execute(&self, stmt: Statement) -> Result<u64, AdminError> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "executing statement");
        let args = bind_params(&stmt.params)?;
        let result = sqlx::query_with(&stmt.sql, args)
            .execute(&self.pool)
            .await
            .map_err(error::summarize)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list_tables(&self) -> Result<Vec<String>, AdminError> {
        self.inspector.list_tables().await
    }

    async fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, AdminError> {
        self.inspector.describe_columns(table).await
    }

    async fn count_rows(&self, table: &str) -> Result<i64, AdminError> {
        self.inspector.count_rows(table).await
    }

    async fn fetch_documents(
        &self,
        table: &str,
        page: Pagination,
    ) -> Result<Vec<Document>, AdminError> {
        let schema = self.inspector.table_schema(table).await?;
        let stmt = build_select(&schema, page)?;
        debug!(
            sql = %stmt.sql,
            page_number = page.page_number(),
            page_size = page.page_size(),
            "fetching documents"
        );

        let args = bind_params(&stmt.params)?;
        let rows = sqlx::query_with(&stmt.sql, args)
            .fetch_all(&self.pool)
            .await
            .map_err(error::summarize)?;

        let rows: Vec<PgDocumentRow> = rows.into_iter().map(PgDocumentRow).collect();
        Ok(to_documents(&rows))
    }

    async fn create_document(
        &self,
        table: &str,
        fields: &FieldSet,
    ) -> Result<MutationOutcome, AdminError> {
        let schema = self.inspector.table_schema(table).await?;
        let rows_affected = self.execute(build_insert(&schema, fields)?).await?;
        info!(table = %schema.name, rows_affected, "document created");
        Ok(MutationOutcome::new(rows_affected))
    }

    async fn edit_document(
        &self,
        table: &str,
        predicate: &PredicateMap,
        fields: &FieldSet,
    ) -> Result<MutationOutcome, AdminError> {
        let schema = self.inspector.table_schema(table).await?;
        let rows_affected = self
            .execute(build_update(&schema, predicate, fields)?)
            .await?;
        info!(table = %schema.name, rows_affected, "documents edited");
        Ok(MutationOutcome::new(rows_affected))
    }

    async fn delete_document(
        &self,
        table: &str,
        predicate: &PredicateMap,
    ) -> Result<MutationOutcome, AdminError> {
        let schema = self.inspector.table_schema(table).await?;
        let rows_affected = self.execute(build_delete(&schema, predicate)?).await?;
        info!(table = %schema.name, rows_affected, "documents deleted");
        Ok(MutationOutcome::new(rows_affected))
    }

    async fn drop_table(&self, table: &str) -> Result<(), AdminError> {
        let schema = self.inspector.table_schema(table).await?;
        self.execute(build_drop(&schema)?).await?;
        info!(table = %schema.name, "table dropped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Arguments;

    #[test]
    fn test_bind_params_counts_every_value() {
        let params = vec![
            ScalarValue::Null,
            ScalarValue::Bool(true),
            ScalarValue::Int(7),
            ScalarValue::Float(1.5),
            ScalarValue::Text("x".into()),
            ScalarValue::Bytes(vec![1, 2, 3]),
        ];
        let args = bind_params(&params).unwrap();
        assert_eq!(args.len(), params.len());
    }
}
