//! Administrator accounts stored in Postgres.

use crate::error::summarize;
use async_trait::async_trait;
use dbadmin_core::{AdminError, AdminRecord, CredentialStore, quote_ident};
use sqlx::{PgPool, Row};
use tracing::info;

#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
    qualified_table: String,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool, schema: &str, table: &str) -> Result<Self, AdminError> {
        Ok(Self {
            pool,
            qualified_table: format!("{}.{}", quote_ident(schema)?, quote_ident(table)?),
        })
    }

    /// Create the account table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<(), AdminError> {
        let sql = format!(
            r#"
            create table if not exists {} (
                username text primary key,
                password text not null,
                email text,
                telegram_id text,
                created_at timestamptz not null default now()
            )
            "#,
            self.qualified_table
        );
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(summarize)?;
        info!(table = %self.qualified_table, "admin account table ready");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_admin(&self, username: &str) -> Result<Option<AdminRecord>, AdminError> {
        let sql = format!(
            "select username, password, email, telegram_id from {} where username = $1",
            self.qualified_table
        );
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(summarize)?;

        row.map(|row| {
            Ok::<_, sqlx::Error>(AdminRecord {
                username: row.try_get("username")?,
                password_hash: row.try_get("password")?,
                email: row.try_get("email")?,
                telegram_id: row.try_get("telegram_id")?,
            })
        })
        .transpose()
        .map_err(summarize)
    }

    async fn insert_admin(&self, record: &AdminRecord) -> Result<(), AdminError> {
        let sql = format!(
            "insert into {} (username, password, email, telegram_id) values ($1, $2, $3, $4)",
            self.qualified_table
        );
        let result = sqlx::query(&sql)
            .bind(&record.username)
            .bind(&record.password_hash)
            .bind(&record.email)
            .bind(&record.telegram_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                info!(username = %record.username, "admin account created");
                Ok(())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                AdminError::Conflict(format!("username '{}' is already taken", record.username)),
            ),
            Err(e) => Err(summarize(e)),
        }
    }

    async fn admin_count(&self) -> Result<i64, AdminError> {
        let sql = format!("select count(*) from {}", self.qualified_table);
        let row = sqlx::query(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(summarize)?;
        row.try_get::<i64, _>(0).map_err(summarize)
    }
}
