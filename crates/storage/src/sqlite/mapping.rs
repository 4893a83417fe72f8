use sqlx::Row;

use crate::repository::{StorageError, StoredValue};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Column values for a stored preference: `(kind, int_value, text_value)`.
pub(crate) fn value_columns(value: &StoredValue) -> (&'static str, Option<i64>, Option<&str>) {
    match value {
        StoredValue::Int(v) => (value.kind(), Some(i64::from(*v)), None),
        StoredValue::Long(v) => (value.kind(), Some(*v), None),
        StoredValue::Text(v) => (value.kind(), None, Some(v.as_str())),
    }
}

pub(crate) fn map_preference_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredValue, StorageError> {
    let kind: String = row.try_get("kind").map_err(ser)?;
    let int_value: Option<i64> = row.try_get("int_value").map_err(ser)?;
    let text_value: Option<String> = row.try_get("text_value").map_err(ser)?;

    match (kind.as_str(), int_value, text_value) {
        ("int", Some(v), None) => i32::try_from(v)
            .map(StoredValue::Int)
            .map_err(|_| StorageError::Serialization(format!("int value out of range: {v}"))),
        ("long", Some(v), None) => Ok(StoredValue::Long(v)),
        ("string", None, Some(v)) => Ok(StoredValue::Text(v)),
        (kind, _, _) => Err(StorageError::Serialization(format!(
            "invalid preference row of kind {kind}"
        ))),
    }
}
