//! Catalog descriptors and identifier validation.
//!
//! Table and column names cannot be bound as parameters, so every identifier
//! that ends up in statement text must first be found in catalog metadata.
//! [`TableSchema`] is the proof of that lookup: the statement builders only
//! accept identifiers that come out of one.

use crate::error::AdminError;
use serde::{Deserialize, Serialize};

/// Built-in types whose binary wire form the row decoder reads directly.
/// Columns of any other type are selected as `::text`.
pub const NATIVE_UDT_NAMES: &[&str] = &[
    "bool", "int2", "int4", "int8", "oid", "float4", "float8", "text", "varchar", "bpchar",
    "name", "uuid", "timestamptz", "timestamp", "date", "time", "json", "jsonb", "bytea",
];

/// One column of a table as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "column_name")]
    pub name: String,

    pub data_type: String,

    #[serde(rename = "is_nullable")]
    pub nullable: bool,

    #[serde(rename = "column_default")]
    pub default_value: Option<String>,

    /// Schema of the column's concrete type (e.g. `pg_catalog`).
    #[serde(default, skip_serializing)]
    pub udt_schema: Option<String>,

    /// Concrete type name (e.g. `int4`, `_text`, a user enum).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udt_name: Option<String>,
}

impl ColumnDescriptor {
    /// Descriptor without type reference; placeholders for it are left uncast.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            default_value: None,
            udt_schema: None,
            udt_name: None,
        }
    }

    pub fn with_udt(mut self, schema: impl Into<String>, name: impl Into<String>) -> Self {
        self.udt_schema = Some(schema.into());
        self.udt_name = Some(name.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    fn is_builtin(&self, type_name: &str) -> bool {
        self.udt_name.as_deref() == Some(type_name)
            && self.udt_schema.as_deref().is_none_or(|s| s == "pg_catalog")
    }

    /// Whether the row decoder can read this column without a text cast.
    /// Columns without type information are read as they come.
    pub fn decodes_natively(&self) -> bool {
        match &self.udt_name {
            None => true,
            Some(name) => NATIVE_UDT_NAMES.contains(&name.as_str()) && self.is_builtin(name),
        }
    }

    pub fn is_bytea(&self) -> bool {
        self.is_builtin("bytea")
    }

    /// `::"schema"."type"` suffix for a placeholder bound to this column, if known.
    pub(crate) fn cast_suffix(&self) -> Result<String, AdminError> {
        match (&self.udt_schema, &self.udt_name) {
            (Some(schema), Some(name)) => {
                Ok(format!("::{}.{}", quote_ident(schema)?, quote_ident(name)?))
            }
            (None, Some(name)) => Ok(format!("::{}", quote_ident(name)?)),
            _ => Ok(String::new()),
        }
    }
}

/// A table that was found in the catalog, with its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    /// Primary key columns in key order; empty when the table has none.
    pub primary_key: Vec<String>,
}

impl TableSchema {
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<ColumnDescriptor>,
    ) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns,
            primary_key: Vec::new(),
        }
    }

    pub fn with_primary_key(mut self, primary_key: Vec<String>) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a caller-supplied column name, rejecting anything the catalog does not know.
    pub fn known_column(&self, name: &str) -> Result<&ColumnDescriptor, AdminError> {
        self.column(name).ok_or_else(|| {
            AdminError::InvalidArgument(format!(
                "unknown column '{}' for table '{}'",
                truncate_for_message(name),
                self.name
            ))
        })
    }

    /// `"schema"."table"`.
    pub fn qualified_name(&self) -> Result<String, AdminError> {
        Ok(format!(
            "{}.{}",
            quote_ident(&self.schema)?,
            quote_ident(&self.name)?
        ))
    }
}

/// Match a requested table name against the catalog's table list.
///
/// Returns the catalog's own copy of the name so that nothing downstream
/// holds on to request text.
pub fn ensure_known_table<'a>(known: &'a [String], requested: &str) -> Result<&'a str, AdminError> {
    if requested.is_empty() {
        return Err(AdminError::invalid("table_name must not be empty"));
    }
    known
        .iter()
        .find(|t| t.as_str() == requested)
        .map(String::as_str)
        .ok_or_else(|| {
            AdminError::NotFound(format!(
                "table '{}' does not exist",
                truncate_for_message(requested)
            ))
        })
}

/// Double-quote an identifier, doubling any embedded quote.
///
/// Only call this with names that came from the catalog.
pub fn quote_ident(ident: &str) -> Result<String, AdminError> {
    if ident.is_empty() {
        return Err(AdminError::invalid("empty identifier"));
    }
    if ident.contains('\0') {
        return Err(AdminError::invalid("identifier contains a NUL byte"));
    }
    Ok(format!("\"{}\"", ident.replace('"', "\"\"")))
}

fn truncate_for_message(s: &str) -> String {
    const MAX: usize = 64;
    if s.chars().count() <= MAX {
        s.to_string()
    } else {
        let head: String = s.chars().take(MAX).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        vec!["orders".to_string(), "users".to_string()]
    }

    #[test]
    fn test_ensure_known_table_returns_catalog_name() {
        let tables = known();
        let name = ensure_known_table(&tables, "users").unwrap();
        assert!(std::ptr::eq(name, tables[1].as_str()));
    }

    #[test]
    fn test_ensure_known_table_rejects_unknown() {
        let err = ensure_known_table(&known(), "users; DROP TABLE users").unwrap_err();
        assert!(matches!(err, AdminError::NotFound(_)));
    }

    #[test]
    fn test_ensure_known_table_rejects_empty() {
        let err = ensure_known_table(&known(), "").unwrap_err();
        assert!(matches!(err, AdminError::InvalidArgument(_)));
    }

    #[test]
    fn test_quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("users").unwrap(), "\"users\"");
        assert_eq!(quote_ident("we\"ird").unwrap(), "\"we\"\"ird\"");
        assert!(quote_ident("").is_err());
    }

    #[test]
    fn test_cast_suffix() {
        let col = ColumnDescriptor::new("id", "integer", false).with_udt("pg_catalog", "int4");
        assert_eq!(col.cast_suffix().unwrap(), "::\"pg_catalog\".\"int4\"");
        let bare = ColumnDescriptor::new("id", "integer", false);
        assert_eq!(bare.cast_suffix().unwrap(), "");
    }

    #[test]
    fn test_descriptor_serializes_with_catalog_names() {
        let col = ColumnDescriptor::new("id", "integer", false)
            .with_udt("pg_catalog", "int4")
            .with_default("nextval('users_id_seq'::regclass)");
        let v = serde_json::to_value(&col).unwrap();
        assert_eq!(v["column_name"], "id");
        assert_eq!(v["data_type"], "integer");
        assert_eq!(v["is_nullable"], false);
        assert_eq!(v["column_default"], "nextval('users_id_seq'::regclass)");
        assert_eq!(v["udt_name"], "int4");
        assert!(v.get("udt_schema").is_none());
    }
}
