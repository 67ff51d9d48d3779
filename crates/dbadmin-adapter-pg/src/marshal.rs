//! Decoding Postgres rows into scalar values.

use dbadmin_core::{RawRow, ScalarValue};
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgRow, PgValueRef};
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{BigDecimal, Uuid};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::warn;

/// A fetched row, decodable column by column.
pub struct PgDocumentRow(pub PgRow);

impl RawRow for PgDocumentRow {
    fn column_count(&self) -> usize {
        self.0.columns().len()
    }

    fn column_name(&self, index: usize) -> &str {
        self.0.column(index).name()
    }

    fn decode(&self, index: usize) -> ScalarValue {
        let raw = match self.0.try_get_raw(index) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, index, "column index out of range");
                return ScalarValue::Null;
            }
        };
        if raw.is_null() {
            return ScalarValue::Null;
        }

        let type_name = raw.type_info().name().to_string();
        match decode_typed(&self.0, index, &type_name) {
            Ok(Some(value)) => value,
            Ok(None) => decode_raw(raw),
            Err(e) => {
                warn!(error = %e, column = self.column_name(index), %type_name, "falling back to raw column value");
                decode_raw(raw)
            }
        }
    }
}

/// Decode the types with a natural scalar form. `None` means the type is not one of them.
fn decode_typed(
    row: &PgRow,
    index: usize,
    type_name: &str,
) -> Result<Option<ScalarValue>, sqlx::Error> {
    let value = match type_name {
        "BOOL" => ScalarValue::Bool(row.try_get::<bool, _>(index)?),
        "INT2" => ScalarValue::Int(row.try_get::<i16, _>(index)?.into()),
        "INT4" => ScalarValue::Int(row.try_get::<i32, _>(index)?.into()),
        "INT8" => ScalarValue::Int(row.try_get::<i64, _>(index)?),
        "OID" => ScalarValue::Int(row.try_get::<Oid, _>(index)?.0.into()),
        "FLOAT4" => ScalarValue::Float(row.try_get::<f32, _>(index)?.into()),
        "FLOAT8" => ScalarValue::Float(row.try_get::<f64, _>(index)?),
        // Kept as text so no precision is lost.
        "NUMERIC" => ScalarValue::Text(row.try_get::<BigDecimal, _>(index)?.to_string()),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => ScalarValue::Text(row.try_get::<String, _>(index)?),
        "UUID" => ScalarValue::Text(row.try_get::<Uuid, _>(index)?.to_string()),
        "TIMESTAMPTZ" => ScalarValue::Text(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339()),
        "TIMESTAMP" => ScalarValue::Text(
            row.try_get::<NaiveDateTime, _>(index)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        "DATE" => ScalarValue::Text(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "TIME" => ScalarValue::Text(row.try_get::<NaiveTime, _>(index)?.to_string()),
        "JSON" | "JSONB" => {
            ScalarValue::Text(row.try_get::<serde_json::Value, _>(index)?.to_string())
        }
        "BYTEA" => ScalarValue::Bytes(row.try_get::<Vec<u8>, _>(index)?),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// Anything else: the wire bytes, as text when they are valid UTF-8.
fn decode_raw(raw: PgValueRef<'_>) -> ScalarValue {
    match raw.as_bytes() {
        Ok(bytes) => bytes_to_scalar(bytes),
        Err(e) => {
            warn!(error = %e, "column value unavailable");
            ScalarValue::Null
        }
    }
}

fn bytes_to_scalar(bytes: &[u8]) -> ScalarValue {
    match std::str::from_utf8(bytes) {
        Ok(text) => ScalarValue::Text(text.to_string()),
        Err(_) => ScalarValue::Bytes(bytes.to_vec()),
    }
}
