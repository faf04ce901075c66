use crate::error::{GuestlistError, GuestlistResult};
use crate::model::Id;

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> GuestlistResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(GuestlistError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Validates that an integer is positive (> 0).
pub fn positive(value: i32, field: &str) -> GuestlistResult<i32> {
    if value <= 0 {
        Err(GuestlistError::NonPositive {
            field: field.to_string(),
        })
    } else {
        Ok(value)
    }
}

pub fn non_empty_set<T>(value: &[T], field: &str) -> GuestlistResult<()> {
    if value.is_empty() {
        Err(GuestlistError::EmptySet {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Validates an optional positive integer (None is valid, Some(n) must be positive).
pub fn optional_positive(value: Option<i32>, field: &str) -> GuestlistResult<Option<i32>> {
    match value {
        None => Ok(None),
        Some(n) => positive(n, field).map(Some),
    }
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parses a caller-supplied identifier. Malformed ids are input errors.
pub fn parse_id<T>(value: &str, field: &str) -> GuestlistResult<Id<T>> {
    Id::parse(value.trim()).map_err(|_| GuestlistError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Trims every name and rejects blanks. Used for batches of guest names.
pub fn non_blank_names(names: &[String], field: &str) -> GuestlistResult<Vec<String>> {
    non_empty_set(names, field)?;
    names.iter().map(|n| non_blank(n, field)).collect()
}
