//! Statement builders for schema-agnostic document operations.
//!
//! Every builder is a pure function of a [`TableSchema`] and the caller's maps.
//! Identifiers are taken from the schema (never from the maps' keys verbatim)
//! and every value is emitted as a `$n` placeholder. When the catalog reports
//! a column's concrete type the placeholder is cast to it, so loosely typed
//! input such as `"2"` for an integer column is converted by the database and
//! a mismatch is reported by it.
//!
//! Byte columns travel as base64 text in documents, so text bound to a `bytea`
//! column is decoded here before it reaches the database.

use crate::catalog::{ColumnDescriptor, TableSchema, quote_ident};
use crate::document::{FieldSet, PredicateMap};
use crate::error::AdminError;
use crate::pagination::Pagination;
use crate::value::ScalarValue;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// SQL text plus the values to bind to `$1..$n`, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<ScalarValue>,
}

impl Statement {
    fn new(sql: String, params: Vec<ScalarValue>) -> Self {
        Self { sql, params }
    }
}

/// Every column over one page, in ordinal order. Rows are ordered by primary key
/// when the table has one.
///
/// Columns the row decoder has no native reading for (arrays, intervals,
/// numerics, user types, ...) are selected as their text form.
pub fn build_select(table: &TableSchema, page: Pagination) -> Result<Statement, AdminError> {
    let items = table
        .columns
        .iter()
        .map(select_item)
        .collect::<Result<Vec<_>, AdminError>>()?;
    let items = if items.is_empty() {
        "*".to_string()
    } else {
        items.join(", ")
    };
    let mut sql = format!("SELECT {} FROM {}", items, table.qualified_name()?);

    if !table.primary_key.is_empty() {
        let order = table
            .primary_key
            .iter()
            .map(|c| quote_ident(&table.known_column(c)?.name))
            .collect::<Result<Vec<_>, AdminError>>()?;
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.join(", "));
    }

    sql.push_str(" LIMIT $1 OFFSET $2");
    Ok(Statement::new(
        sql,
        vec![
            ScalarValue::Int(page.limit()),
            ScalarValue::Int(page.offset()),
        ],
    ))
}

fn select_item(column: &ColumnDescriptor) -> Result<String, AdminError> {
    let ident = quote_ident(&column.name)?;
    if column.decodes_natively() {
        Ok(ident)
    } else {
        Ok(format!("{ident}::text AS {ident}"))
    }
}

/// The value to bind for `column`.
fn bound_value(column: &ColumnDescriptor, value: &ScalarValue) -> Result<ScalarValue, AdminError> {
    match value {
        ScalarValue::Text(text) if column.is_bytea() => STANDARD
            .decode(text)
            .map(ScalarValue::Bytes)
            .map_err(|_| {
                AdminError::InvalidArgument(format!(
                    "column '{}' expects base64-encoded bytes",
                    column.name
                ))
            }),
        other => Ok(other.clone()),
    }
}

pub fn build_count(table: &TableSchema) -> Result<Statement, AdminError> {
    Ok(Statement::new(
        format!("SELECT COUNT(*) FROM {}", table.qualified_name()?),
        Vec::new(),
    ))
}

pub fn build_insert(table: &TableSchema, fields: &FieldSet) -> Result<Statement, AdminError> {
    if fields.is_empty() {
        return Err(AdminError::invalid("document_data must not be empty"));
    }

    let mut columns = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());

    for (name, value) in fields {
        let column = table.known_column(name)?;
        params.push(bound_value(column, value)?);
        columns.push(quote_ident(&column.name)?);
        placeholders.push(format!("${}{}", params.len(), column.cast_suffix()?));
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.qualified_name()?,
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(Statement::new(sql, params))
}

pub fn build_update(
    table: &TableSchema,
    predicate: &PredicateMap,
    fields: &FieldSet,
) -> Result<Statement, AdminError> {
    if predicate.is_empty() {
        return Err(AdminError::invalid(
            "prev_document must not be empty; an empty predicate would update every row",
        ));
    }
    if fields.is_empty() {
        return Err(AdminError::invalid("updated_document must not be empty"));
    }

    let mut params = Vec::with_capacity(fields.len() + predicate.len());
    let mut assignments = Vec::with_capacity(fields.len());

    for (name, value) in fields {
        let column = table.known_column(name)?;
        params.push(bound_value(column, value)?);
        assignments.push(format!(
            "{} = ${}{}",
            quote_ident(&column.name)?,
            params.len(),
            column.cast_suffix()?
        ));
    }

    let condition = where_clause(table, predicate, &mut params)?;
    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        table.qualified_name()?,
        assignments.join(", "),
        condition
    );
    Ok(Statement::new(sql, params))
}

pub fn build_delete(table: &TableSchema, predicate: &PredicateMap) -> Result<Statement, AdminError> {
    if predicate.is_empty() {
        return Err(AdminError::invalid(
            "document_data must not be empty; an empty predicate would delete every row",
        ));
    }

    let mut params = Vec::with_capacity(predicate.len());
    let condition = where_clause(table, predicate, &mut params)?;
    let sql = format!("DELETE FROM {} WHERE {}", table.qualified_name()?, condition);
    Ok(Statement::new(sql, params))
}

pub fn build_drop(table: &TableSchema) -> Result<Statement, AdminError> {
    Ok(Statement::new(
        format!("DROP TABLE {}", table.qualified_name()?),
        Vec::new(),
    ))
}

/// AND-joined equality terms in column-name order, appending bound values to `params`.
///
/// A `Null` value becomes `IS NULL` and binds nothing.
fn where_clause(
    table: &TableSchema,
    predicate: &PredicateMap,
    params: &mut Vec<ScalarValue>,
) -> Result<String, AdminError> {
    let mut terms = Vec::with_capacity(predicate.len());
    for (name, value) in predicate {
        let column = table.known_column(name)?;
        let ident = quote_ident(&column.name)?;
        if value.is_null() {
            terms.push(format!("{ident} IS NULL"));
        } else {
            params.push(bound_value(column, value)?);
            terms.push(format!("{ident} = ${}{}", params.len(), column.cast_suffix()?));
        }
    }
    Ok(terms.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnDescriptor;

    fn users() -> TableSchema {
        TableSchema::new(
            "public",
            "users",
            vec![
                ColumnDescriptor::new("id", "integer", false).with_udt("pg_catalog", "int4"),
                ColumnDescriptor::new("name", "text", true).with_udt("pg_catalog", "text"),
                ColumnDescriptor::new("email", "character varying", true),
            ],
        )
        .with_primary_key(vec!["id".to_string()])
    }

    fn fields(pairs: &[(&str, ScalarValue)]) -> FieldSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_select_binds_limit_and_offset() {
        let stmt = build_select(&users(), Pagination::new(2, 10).unwrap()).unwrap();
        assert_eq!(
            stmt.sql,
            r#"SELECT "id", "name", "email" FROM "public"."users" ORDER BY "id" LIMIT $1 OFFSET $2"#
        );
        assert_eq!(stmt.params, vec![ScalarValue::Int(10), ScalarValue::Int(20)]);
    }

    #[test]
    fn test_select_without_primary_key_has_no_order() {
        let table = TableSchema::new("public", "log", vec![ColumnDescriptor::new("msg", "text", true)]);
        let stmt = build_select(&table, Pagination::new(0, 5).unwrap()).unwrap();
        assert_eq!(stmt.sql, r#"SELECT "msg" FROM "public"."log" LIMIT $1 OFFSET $2"#);
    }

    #[test]
    fn test_select_reads_non_native_types_as_text() {
        let table = TableSchema::new(
            "public",
            "jobs",
            vec![
                ColumnDescriptor::new("id", "integer", false).with_udt("pg_catalog", "int4"),
                ColumnDescriptor::new("tags", "ARRAY", true).with_udt("pg_catalog", "_text"),
                ColumnDescriptor::new("runtime", "interval", true)
                    .with_udt("pg_catalog", "interval"),
                ColumnDescriptor::new("mood", "USER-DEFINED", true).with_udt("public", "mood"),
                ColumnDescriptor::new("shadow", "USER-DEFINED", true).with_udt("public", "text"),
            ],
        );
        let stmt = build_select(&table, Pagination::new(0, 5).unwrap()).unwrap();
        assert_eq!(
            stmt.sql,
            r#"SELECT "id", "tags"::text AS "tags", "runtime"::text AS "runtime", "mood"::text AS "mood", "shadow"::text AS "shadow" FROM "public"."jobs" LIMIT $1 OFFSET $2"#
        );
    }

    fn files() -> TableSchema {
        TableSchema::new(
            "public",
            "files",
            vec![
                ColumnDescriptor::new("id", "integer", false).with_udt("pg_catalog", "int4"),
                ColumnDescriptor::new("blob", "bytea", true).with_udt("pg_catalog", "bytea"),
            ],
        )
    }

    #[test]
    fn test_bytea_text_is_base64_decoded() {
        let p = fields(&[("blob", ScalarValue::Text("AJ+Slg==".into()))]);
        let f = fields(&[("blob", ScalarValue::Text("3q2+7w==".into()))]);

        let stmt = build_update(&files(), &p, &f).unwrap();
        assert_eq!(
            stmt.params,
            vec![
                ScalarValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
                ScalarValue::Bytes(vec![0, 159, 146, 150]),
            ]
        );

        let stmt = build_insert(&files(), &f).unwrap();
        assert_eq!(stmt.params, vec![ScalarValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef])]);

        // Non-text values are bound unchanged.
        let stmt = build_delete(&files(), &fields(&[("blob", ScalarValue::Bytes(vec![1]))])).unwrap();
        assert_eq!(stmt.params, vec![ScalarValue::Bytes(vec![1])]);
    }

    #[test]
    fn test_bytea_rejects_invalid_base64() {
        let p = fields(&[("blob", ScalarValue::Text("not base64!".into()))]);
        assert!(matches!(
            build_delete(&files(), &p),
            Err(AdminError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_insert_binds_every_value() {
        let secret = "s3cr3t-'value'--";
        let f = fields(&[
            ("name", ScalarValue::Text(secret.to_string())),
            ("email", ScalarValue::Text("a@b.c".to_string())),
            ("id", ScalarValue::Int(7)),
        ]);
        let stmt = build_insert(&users(), &f).unwrap();

        assert_eq!(stmt.params.len(), f.len());
        assert!(!stmt.sql.contains(secret));
        assert!(!stmt.sql.contains("a@b.c"));
        assert_eq!(
            stmt.sql,
            r#"INSERT INTO "public"."users" ("email", "id", "name") VALUES ($1, $2::"pg_catalog"."int4", $3::"pg_catalog"."text")"#
        );
        assert_eq!(
            stmt.params,
            vec![
                ScalarValue::Text("a@b.c".to_string()),
                ScalarValue::Int(7),
                ScalarValue::Text(secret.to_string()),
            ]
        );
    }

    #[test]
    fn test_insert_rejects_empty_field_set() {
        let err = build_insert(&users(), &FieldSet::new()).unwrap_err();
        assert!(matches!(err, AdminError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_and_hostile_columns_rejected() {
        let hostile = [
            "nope",
            "'; DROP TABLE x; --",
            "name\" = 'x'; --",
            "ID",
            "name ",
        ];
        for bogus in hostile {
            let f = fields(&[(bogus, ScalarValue::Text("v".into()))]);
            let p = fields(&[("id", ScalarValue::Int(1))]);

            assert!(
                matches!(build_insert(&users(), &f), Err(AdminError::InvalidArgument(_))),
                "insert accepted {bogus:?}"
            );
            assert!(
                matches!(build_update(&users(), &p, &f), Err(AdminError::InvalidArgument(_))),
                "update accepted {bogus:?} in field set"
            );
            assert!(
                matches!(build_update(&users(), &f, &p), Err(AdminError::InvalidArgument(_))),
                "update accepted {bogus:?} in predicate"
            );
            assert!(
                matches!(build_delete(&users(), &f), Err(AdminError::InvalidArgument(_))),
                "delete accepted {bogus:?}"
            );
        }
    }

    #[test]
    fn test_update_and_delete_reject_empty_predicate() {
        let f = fields(&[("name", ScalarValue::Text("z".into()))]);
        assert!(matches!(
            build_update(&users(), &PredicateMap::new(), &f),
            Err(AdminError::InvalidArgument(_))
        ));
        assert!(matches!(
            build_delete(&users(), &PredicateMap::new()),
            Err(AdminError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_update_rejects_empty_field_set() {
        let p = fields(&[("id", ScalarValue::Int(1))]);
        assert!(matches!(
            build_update(&users(), &p, &FieldSet::new()),
            Err(AdminError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_update_sorted_and_deterministic() {
        let p = fields(&[
            ("name", ScalarValue::Text("b".into())),
            ("id", ScalarValue::Text("2".into())),
        ]);
        let f = fields(&[("name", ScalarValue::Text("z".into()))]);

        let first = build_update(&users(), &p, &f).unwrap();
        for _ in 0..10 {
            assert_eq!(build_update(&users(), &p, &f).unwrap().sql, first.sql);
        }

        assert_eq!(
            first.sql,
            r#"UPDATE "public"."users" SET "name" = $1::"pg_catalog"."text" WHERE "id" = $2::"pg_catalog"."int4" AND "name" = $3::"pg_catalog"."text""#
        );
        let where_part = first.sql.split(" WHERE ").nth(1).unwrap();
        assert_eq!(where_part.split(" AND ").count(), p.len());
        assert_eq!(
            first.params,
            vec![
                ScalarValue::Text("z".into()),
                ScalarValue::Text("2".into()),
                ScalarValue::Text("b".into()),
            ]
        );
    }

    #[test]
    fn test_delete_predicate_terms() {
        let p = fields(&[
            ("id", ScalarValue::Int(3)),
            ("email", ScalarValue::Null),
        ]);
        let stmt = build_delete(&users(), &p).unwrap();
        assert_eq!(
            stmt.sql,
            r#"DELETE FROM "public"."users" WHERE "email" IS NULL AND "id" = $1::"pg_catalog"."int4""#
        );
        assert_eq!(stmt.params, vec![ScalarValue::Int(3)]);
    }

    #[test]
    fn test_count_and_drop() {
        assert_eq!(
            build_count(&users()).unwrap().sql,
            r#"SELECT COUNT(*) FROM "public"."users""#
        );
        assert_eq!(
            build_drop(&users()).unwrap().sql,
            r#"DROP TABLE "public"."users""#
        );
    }

    #[test]
    fn test_identifier_with_quote_is_escaped() {
        let table = TableSchema::new(
            "public",
            "odd\"table",
            vec![ColumnDescriptor::new("we\"ird", "text", true)],
        );
        let f = fields(&[("we\"ird", ScalarValue::Text("x".into()))]);
        let stmt = build_insert(&table, &f).unwrap();
        assert_eq!(
            stmt.sql,
            r#"INSERT INTO "public"."odd""table" ("we""ird") VALUES ($1)"#
        );
    }
}
