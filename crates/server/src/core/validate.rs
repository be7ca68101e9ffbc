//! Request body extraction with declarative field checks.

use crate::core::error::{Error, Result};
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

/// JSON body that has passed its `#[validate(...)]` rules.
///
/// Malformed JSON and failed rules are both reported as a 400 before the
/// handler runs, so handlers never touch the store with bad input.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::field("body", rejection.body_text()))?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Treats blank strings as absent, the way optional form fields arrive.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Required text field: rejects empty and whitespace-only values.
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("  x ").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t\n").is_err());
    }

    #[test]
    fn test_present_drops_blank_values() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some("   ".into())), None);
        assert_eq!(present(Some(" Acme ".into())), Some("Acme".into()));
    }
}
