//! Driver error summarization.
//!
//! Raw Postgres messages can echo row contents and schema details, so they
//! are logged here and replaced by a short summary before leaving the adapter.

use dbadmin_core::AdminError;
use sqlx::error::ErrorKind;
use tracing::warn;

/// Log `err` in full and turn it into an [`AdminError`] that is safe to return to a client.
pub fn summarize(err: sqlx::Error) -> AdminError {
    warn!(error = %err, "database operation failed");
    classify(&err)
}

fn classify(err: &sqlx::Error) -> AdminError {
    match err {
        sqlx::Error::Database(db) => {
            let summary = match db.kind() {
                ErrorKind::UniqueViolation => "a unique constraint was violated",
                ErrorKind::ForeignKeyViolation => "a foreign key constraint was violated",
                ErrorKind::NotNullViolation => "a required column was missing or null",
                ErrorKind::CheckViolation => "a check constraint was violated",
                _ => {
                    let code = db.code();
                    return classify_sqlstate(code.as_deref().unwrap_or(""));
                }
            };
            AdminError::Query(summary.to_string())
        }
        sqlx::Error::RowNotFound => AdminError::not_found("no matching row"),
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => {
            AdminError::Unavailable("the database is not reachable".to_string())
        }
        sqlx::Error::Encode(_) => AdminError::invalid("a value could not be encoded"),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            AdminError::Internal("a result value could not be decoded".to_string())
        }
        _ => AdminError::Internal("unexpected database error".to_string()),
    }
}

fn classify_sqlstate(code: &str) -> AdminError {
    let summary = match code {
        "42P01" => return AdminError::not_found("table does not exist"),
        "42703" => "a column does not exist",
        "42883" => "the operation is not supported for the column's type",
        "42501" => "insufficient privilege for this operation",
        "2BP01" => "the table is still referenced by other objects",
        "40001" | "40P01" => "the statement was aborted by a concurrent transaction; retry",
        "57014" => "the statement was cancelled",
        c if c.starts_with("22") => "a value has the wrong type or format",
        c if c.starts_with("23") => "an integrity constraint was violated",
        c if c.starts_with("08") => {
            return AdminError::Unavailable("the database is not reachable".to_string());
        }
        c if c.starts_with("53") => {
            return AdminError::Unavailable("the database is out of resources".to_string());
        }
        _ => "the database rejected the statement",
    };
    AdminError::Query(summary.to_string())
}
