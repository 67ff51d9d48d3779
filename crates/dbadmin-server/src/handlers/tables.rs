//! Table and document endpoints. All of them sit behind the admin guard.

use crate::api_types::{
    ColumnMap, DocumentRequest, DocumentsQuery, DropTableRequest, EditDocumentRequest,
    MessageResponse, MutationResponse, TableInfoResponse, TableQuery,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use dbadmin_core::{AdminError, Document, MutationOutcome, Pagination, to_field_set};

fn require_table_name(table_name: &str) -> Result<&str, ApiError> {
    if table_name.is_empty() {
        return Err(ApiError::BadRequest("table_name is required".to_string()));
    }
    Ok(table_name)
}

/// An unknown table is a bad request on every endpoint except `/dropTable`.
fn bad_table(err: AdminError) -> ApiError {
    match err {
        AdminError::NotFound(msg) => ApiError::BadRequest(msg),
        other => other.into(),
    }
}

fn mutation_response(outcome: MutationOutcome, done: &str, noop: &str) -> Json<MutationResponse> {
    let message = if outcome.is_noop() { noop } else { done };
    Json(MutationResponse {
        message: message.to_string(),
        rows_affected: outcome.rows_affected,
    })
}

/// `GET /tableNames`
pub async fn table_names(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.documents().list_tables().await?))
}

/// `GET /tableInfo?table_name=T`
pub async fn table_info(
    State(state): State<AppState>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> Result<Json<TableInfoResponse>, ApiError> {
    let Query(query) = query?;
    let table_name = require_table_name(&query.table_name)?;

    let columns = state
        .documents()
        .describe_columns(table_name)
        .await
        .map_err(bad_table)?;
    let table_size = state
        .documents()
        .count_rows(table_name)
        .await
        .map_err(bad_table)?;

    Ok(Json(TableInfoResponse {
        table_name: table_name.to_string(),
        columns: ColumnMap(columns),
        table_size,
    }))
}

/// `GET /tableDocuments?table_name=T&page_number=N&document_per_page=M`
pub async fn table_documents(
    State(state): State<AppState>,
    query: Result<Query<DocumentsQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let Query(query) = query?;
    let table_name = require_table_name(&query.table_name)?;
    let page = Pagination::parse(
        &query.page_number,
        &query.document_per_page,
        state.settings().max_page_size,
    )?;

    let documents = state
        .documents()
        .fetch_documents(table_name, page)
        .await
        .map_err(bad_table)?;
    Ok(Json(documents))
}

/// `POST /createDocument`
pub async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError> {
    let Json(req) = payload?;
    let table_name = require_table_name(&req.table_name)?;
    let fields = to_field_set(req.document_data);

    let outcome = state
        .documents()
        .create_document(table_name, &fields)
        .await
        .map_err(bad_table)?;
    Ok(mutation_response(
        outcome,
        "Document created successfully!",
        "No document was created.",
    ))
}

/// `POST /editDocument`
pub async fn edit_document(
    State(state): State<AppState>,
    payload: Result<Json<EditDocumentRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError> {
    let Json(req) = payload?;
    let table_name = require_table_name(&req.table_name)?;
    let predicate = to_field_set(req.prev_document);
    let fields = to_field_set(req.updated_document);

    let outcome = state
        .documents()
        .edit_document(table_name, &predicate, &fields)
        .await
        .map_err(bad_table)?;
    Ok(mutation_response(
        outcome,
        "Document edited successfully!",
        "No document matched prev_document; nothing was edited.",
    ))
}

/// `DELETE /deleteDocument`
pub async fn delete_document(
    State(state): State<AppState>,
    payload: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError> {
    let Json(req) = payload?;
    let table_name = require_table_name(&req.table_name)?;
    let predicate = to_field_set(req.document_data);

    let outcome = state
        .documents()
        .delete_document(table_name, &predicate)
        .await
        .map_err(bad_table)?;
    Ok(mutation_response(
        outcome,
        "Document deleted successfully!",
        "No document matched document_data; nothing was deleted.",
    ))
}

/// `DELETE /dropTable`
pub async fn drop_table(
    State(state): State<AppState>,
    payload: Result<Json<DropTableRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    let table_name = require_table_name(&req.table_name)?;

    state.documents().drop_table(table_name).await?;
    Ok(Json(MessageResponse::new("Table dropped successfully!")))
}
