//! API request and response types.

use dbadmin_core::{ColumnDescriptor, Document};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// =============================================================================
// Table Browser Types
// =============================================================================

/// `?table_name=` for `/tableInfo`.
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub table_name: String,
}

/// Query string for `/tableDocuments`. Numbers are parsed by the handler so
/// that a bad value produces a specific message.
#[derive(Debug, Deserialize)]
pub struct DocumentsQuery {
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub page_number: String,
    #[serde(default)]
    pub document_per_page: String,
}

/// Response for `/tableInfo`.
#[derive(Debug, Serialize)]
pub struct TableInfoResponse {
    pub table_name: String,
    pub columns: ColumnMap,
    pub table_size: i64,
}

/// Columns keyed by name, serialized in ordinal order.
#[derive(Debug)]
pub struct ColumnMap(pub Vec<ColumnDescriptor>);

impl Serialize for ColumnMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for column in &self.0 {
            map.serialize_entry(&column.name, column)?;
        }
        map.end()
    }
}

// =============================================================================
// Document Mutation Types
// =============================================================================

/// Body of `/createDocument` and `/deleteDocument`.
#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub table_name: String,
    #[serde(default)]
    pub document_data: Document,
}

#[derive(Debug, Deserialize)]
pub struct EditDocumentRequest {
    pub table_name: String,
    #[serde(default)]
    pub prev_document: Document,
    #[serde(default)]
    pub updated_document: Document,
}

#[derive(Debug, Deserialize)]
pub struct DropTableRequest {
    pub table_name: String,
}

/// Outcome of an INSERT, UPDATE or DELETE.
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: String,
    pub rows_affected: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Account Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telegram_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub message: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_map_keeps_ordinal_order() {
        let info = TableInfoResponse {
            table_name: "users".into(),
            columns: ColumnMap(vec![
                ColumnDescriptor::new("id", "integer", false),
                ColumnDescriptor::new("name", "text", true),
            ]),
            table_size: 3,
        };
        let text = serde_json::to_string(&info).unwrap();
        assert!(text.find("\"id\":").unwrap() < text.find("\"name\":").unwrap());

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["columns"]["name"]["is_nullable"], json!(true));
        assert_eq!(value["table_size"], json!(3));
    }

    #[test]
    fn test_edit_request_keeps_loose_values() {
        let req: EditDocumentRequest = serde_json::from_value(json!({
            "table_name": "users",
            "prev_document": {"id": "2"},
            "updated_document": {"name": "z", "nickname": null}
        }))
        .unwrap();
        assert_eq!(req.prev_document.len(), 1);
        assert_eq!(req.updated_document.len(), 2);
    }
}
