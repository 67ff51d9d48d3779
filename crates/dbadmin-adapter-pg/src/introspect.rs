//! Catalog lookups for the configured schema.
//!
//! Every query here binds the schema and table names as parameters. The
//! names are then checked against [`SchemaInspector::list_tables`] before any
//! of them is used as an identifier.

use crate::error::summarize;
use dbadmin_core::query::build_count;
use dbadmin_core::{AdminError, ColumnDescriptor, DatabaseConfig, TableSchema, ensure_known_table};
use sqlx::{PgPool, Row};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SchemaInspector {
    pool: PgPool,
    config: DatabaseConfig,
}

impl SchemaInspector {
    /// Inspect `config.schema`, leaving out `config.hidden_tables`.
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            config: config.clone(),
        }
    }

    /// Base tables of the schema ordered by name, minus the hidden ones.
    pub async fn list_tables(&self) -> Result<Vec<String>, AdminError> {
        let rows = sqlx::query(
            r#"
            select table_name::text as table_name
            from information_schema.tables
            where table_schema = $1
              and table_type = 'BASE TABLE'
            order by table_name
            "#,
        )
        .bind(&self.config.schema)
        .fetch_all(&self.pool)
        .await
        .map_err(summarize)?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("table_name").map_err(summarize)?;
            if !self.config.is_hidden(&name) {
                tables.push(name);
            }
        }
        Ok(tables)
    }

    /// Columns of `table` in ordinal order. `NotFound` if the table is not listed.
    pub async fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, AdminError> {
        let tables = self.list_tables().await?;
        let table = ensure_known_table(&tables, table)?;
        self.columns_of(table).await
    }

    pub async fn count_rows(&self, table: &str) -> Result<i64, AdminError> {
        let schema = self.table_schema(table).await?;
        let stmt = build_count(&schema)?;
        debug!(sql = %stmt.sql, "counting rows");
        let row = sqlx::query(&stmt.sql)
            .fetch_one(&self.pool)
            .await
            .map_err(summarize)?;
        row.try_get::<i64, _>(0).map_err(summarize)
    }

    /// Validate `table` and load everything the statement builders need.
    pub async fn table_schema(&self, table: &str) -> Result<TableSchema, AdminError> {
        let tables = self.list_tables().await?;
        let table = ensure_known_table(&tables, table)?;
        let columns = self.columns_of(table).await?;
        let primary_key = self.primary_key_of(table).await?;
        Ok(TableSchema::new(self.config.schema.clone(), table, columns).with_primary_key(primary_key))
    }

    async fn columns_of(&self, table: &str) -> Result<Vec<ColumnDescriptor>, AdminError> {
        let rows = sqlx::query(
            r#"
            select column_name::text as column_name,
                   data_type::text as data_type,
                   is_nullable::text as is_nullable,
                   column_default::text as column_default,
                   udt_schema::text as udt_schema,
                   udt_name::text as udt_name
            from information_schema.columns
            where table_schema = $1 and table_name = $2
            order by ordinal_position
            "#,
        )
        .bind(&self.config.schema)
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(summarize)?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("column_name").map_err(summarize)?;
            let data_type: String = row.try_get("data_type").map_err(summarize)?;
            let is_nullable: String = row.try_get("is_nullable").map_err(summarize)?;
            let default_value: Option<String> = row.try_get("column_default").map_err(summarize)?;
            let udt_schema: Option<String> = row.try_get("udt_schema").map_err(summarize)?;
            let udt_name: Option<String> = row.try_get("udt_name").map_err(summarize)?;

            let mut column = ColumnDescriptor::new(name, data_type, is_nullable == "YES");
            column.default_value = default_value;
            column.udt_schema = udt_schema;
            column.udt_name = udt_name;
            columns.push(column);
        }
        Ok(columns)
    }

    async fn primary_key_of(&self, table: &str) -> Result<Vec<String>, AdminError> {
        let rows = sqlx::query(
            r#"
            select kcu.column_name::text as column_name
            from information_schema.table_constraints tc
            join information_schema.key_column_usage kcu
              on tc.constraint_name = kcu.constraint_name
             and tc.table_schema = kcu.table_schema
             and tc.table_name = kcu.table_name
            where tc.constraint_type = 'PRIMARY KEY'
              and tc.table_schema = $1
              and tc.table_name = $2
            order by kcu.ordinal_position
            "#,
        )
        .bind(&self.config.schema)
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(summarize)?;

        rows.into_iter()
            .map(|r| r.try_get::<String, _>("column_name").map_err(summarize))
            .collect()
    }
}
