//! Boundary validation: structural shape checks applied before a payload
//! can reach persistence. Type/shape/enum only, no business rules.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::db::models::PostStatus;
use crate::error::CafeError;

/// Declares the expected shape of a write payload. `check_shape` runs
/// against the raw JSON before deserialization so rejections carry the
/// offending field.
pub trait Shaped: DeserializeOwned {
    fn check_shape(value: &Value) -> Result<(), CafeError>;
}

/// Extractor wrapper: parse JSON, shape-check, then deserialize.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Shaped,
{
    type Rejection = CafeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| CafeError::validation("body", rejection.body_text()))?;
        T::check_shape(&value)?;
        let typed = serde_json::from_value::<T>(value)?;
        Ok(ValidatedJson(typed))
    }
}

/// Path extractor for `/api/posts/{id}` that rejects with the standard
/// error envelope instead of axum's plain-text 400.
pub struct PostId(pub i64);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = CafeError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| CafeError::validation("id", rejection.body_text()))?;
        raw.parse::<i64>()
            .map(PostId)
            .map_err(|_| CafeError::validation("id", "must be an integer"))
    }
}

pub fn as_object(value: &Value) -> Result<&Map<String, Value>, CafeError> {
    value
        .as_object()
        .ok_or_else(|| CafeError::validation("body", "expected a JSON object"))
}

pub fn require_string(obj: &Map<String, Value>, field: &str) -> Result<(), CafeError> {
    match obj.get(field) {
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(CafeError::validation(field, "must be a string")),
        None => Err(CafeError::validation(field, "is required")),
    }
}

pub fn optional_string(obj: &Map<String, Value>, field: &str) -> Result<(), CafeError> {
    match obj.get(field) {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(CafeError::validation(field, "must be a string")),
    }
}

/// `status` must be one of the enumerated values when present.
pub fn optional_status(obj: &Map<String, Value>) -> Result<(), CafeError> {
    match obj.get("status") {
        None => Ok(()),
        Some(Value::String(s)) if PostStatus::parse(s).is_some() => Ok(()),
        Some(_) => Err(CafeError::validation(
            "status",
            format!("must be one of: {}", PostStatus::ALLOWED.join(", ")),
        )),
    }
}

/// `tags` must be an array of strings when present.
pub fn optional_string_array(obj: &Map<String, Value>, field: &str) -> Result<(), CafeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(CafeError::validation(field, "must be an array of strings")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_of(err: CafeError) -> String {
        match err {
            CafeError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn require_string_reports_missing_field() {
        let value = json!({"body": "<p>hi</p>"});
        let obj = as_object(&value).unwrap();
        assert_eq!(field_of(require_string(obj, "title").unwrap_err()), "title");
        assert!(require_string(obj, "body").is_ok());
    }

    #[test]
    fn require_string_rejects_wrong_type() {
        let value = json!({"title": 42});
        let obj = as_object(&value).unwrap();
        assert_eq!(field_of(require_string(obj, "title").unwrap_err()), "title");
    }

    #[test]
    fn status_must_be_enumerated() {
        let ok = json!({"status": "published"});
        assert!(optional_status(as_object(&ok).unwrap()).is_ok());

        let bad = json!({"status": "archived"});
        assert_eq!(
            field_of(optional_status(as_object(&bad).unwrap()).unwrap_err()),
            "status"
        );

        let absent = json!({});
        assert!(optional_status(as_object(&absent).unwrap()).is_ok());
    }

    #[test]
    fn tags_must_be_string_array() {
        let ok = json!({"tags": ["coffee", "life"]});
        assert!(optional_string_array(as_object(&ok).unwrap(), "tags").is_ok());

        let bad = json!({"tags": ["coffee", 7]});
        assert!(optional_string_array(as_object(&bad).unwrap(), "tags").is_err());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(as_object(&json!(["not", "an", "object"])).is_err());
    }
}
