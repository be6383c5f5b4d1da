//! Field checks shared by every create/update path.

use chrono::Datelike;

use crate::errors::ModelError;

/// Trimmed, non-empty text or a `"<field> is required"` error.
pub fn required_text(field: &str, value: Option<&str>) -> Result<String, ModelError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ModelError::required(field)),
    }
}

/// Presence check for non-text required fields.
pub fn required<T>(field: &str, value: Option<T>) -> Result<T, ModelError> {
    value.ok_or_else(|| ModelError::required(field))
}

/// Trim optional text, collapsing blanks to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

pub fn non_negative_cents(field: &str, cents: i64) -> Result<i64, ModelError> {
    if cents < 0 {
        return Err(ModelError::Validation(format!("{field} must be >= 0")));
    }
    Ok(cents)
}

pub fn rating(value: f64) -> Result<f64, ModelError> {
    if !(0.0..=5.0).contains(&value) {
        return Err(ModelError::Validation("rating must be between 0 and 5".into()));
    }
    Ok(value)
}

/// Model years run from the first production car to next year's lineup.
pub fn vehicle_year(year: i32) -> Result<i32, ModelError> {
    let max = chrono::Utc::now().year() + 1;
    if !(1886..=max).contains(&year) {
        return Err(ModelError::Validation(format!("year must be between 1886 and {max}")));
    }
    Ok(year)
}

pub fn url(field: &str, value: &str) -> Result<(), ModelError> {
    if value.starts_with("http://") || value.starts_with("https://") || value.starts_with('/') {
        return Ok(());
    }
    Err(ModelError::Validation(format!("{field} must be an http(s) URL or absolute path")))
}

/// Lowercase, trim and strip leading `#`; tags are 1..=64 chars of
/// alphanumerics, `_` or `-`.
pub fn normalize_tag(raw: &str) -> Result<String, ModelError> {
    let tag = raw.trim().trim_start_matches('#').trim().to_lowercase();
    if tag.is_empty() {
        return Err(ModelError::required("tag"));
    }
    max_len("tag", &tag, 64)?;
    if !tag.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(ModelError::Validation(format!("invalid tag '{raw}'")));
    }
    Ok(tag)
}

/// Normalize a list of free-form labels: trimmed, non-empty, deduplicated
/// (case-insensitive, first spelling wins).
pub fn label_list(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", Some("  Bob ")).unwrap(), "Bob");
        let err = required_text("name", Some("   ")).unwrap_err();
        assert_eq!(err.to_string(), "validation error: name is required");
        assert!(required_text("name", None).is_err());
    }

    #[test]
    fn optional_text_collapses_blank() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" x ")), Some("x".to_string()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn tag_normalization() {
        assert_eq!(normalize_tag("  #Coffee ").unwrap(), "coffee");
        assert_eq!(normalize_tag("street-food").unwrap(), "street-food");
        assert!(normalize_tag("#").is_err());
        assert!(normalize_tag("two words").is_err());
    }

    #[test]
    fn vehicle_year_bounds() {
        assert!(vehicle_year(1885).is_err());
        assert!(vehicle_year(1886).is_ok());
        assert!(vehicle_year(2020).is_ok());
        assert!(vehicle_year(chrono::Utc::now().year() + 2).is_err());
    }

    #[test]
    fn rating_and_price_bounds() {
        assert!(rating(5.0).is_ok());
        assert!(rating(5.1).is_err());
        assert!(non_negative_cents("price_cents", -1).is_err());
        assert_eq!(non_negative_cents("price_cents", 0).unwrap(), 0);
    }

    #[test]
    fn label_list_dedupes_case_insensitively() {
        let out = label_list(&["Rust".into(), " rust ".into(), "".into(), "Go".into()]);
        assert_eq!(out, vec!["Rust".to_string(), "Go".to_string()]);
    }

    #[test]
    fn url_shapes() {
        assert!(url("website", "https://bucks.example").is_ok());
        assert!(url("logo_url", "/storage/a.png").is_ok());
        assert!(url("website", "ftp://x").is_err());
    }
}
