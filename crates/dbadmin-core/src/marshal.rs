//! Row marshaling: result-set rows into documents.

use crate::document::Document;
use crate::value::ScalarValue;

/// A driver result row seen positionally.
///
/// Implementations decode each cell into a [`ScalarValue`] and must not fail:
/// a type they do not understand degrades to text or raw bytes.
pub trait RawRow {
    fn column_count(&self) -> usize;

    fn column_name(&self, index: usize) -> &str;

    fn decode(&self, index: usize) -> ScalarValue;
}

/// Zip column names with decoded values. NULL cells stay as explicit `Null` entries.
pub fn to_document<R: RawRow + ?Sized>(row: &R) -> Document {
    let count = row.column_count();
    let mut doc = Document::with_capacity(count);
    for index in 0..count {
        doc.insert(row.column_name(index), row.decode(index));
    }
    doc
}

pub fn to_documents<R: RawRow>(rows: &[R]) -> Vec<Document> {
    rows.iter().map(to_document).collect()
}
