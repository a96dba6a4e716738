//! Request validation gate
//!
//! A route opts in by taking `Validated<S>` as an extractor, where `S` is a
//! [`RequestSchema`] describing the body/params/query sections it expects.
//! Every section is parsed and checked before the handler runs; on failure the
//! request ends here with a 400 listing each failing field by dotted path
//! (`body.category`, `params.id`, ...).

use super::error::AppError;
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// One failing field
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejection produced by the gate
#[derive(Debug, Serialize)]
pub struct ValidationFailure {
    pub message: &'static str,
    pub errors: Vec<FieldIssue>,
}

impl ValidationFailure {
    pub fn new(mut errors: Vec<FieldIssue>) -> Self {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Self {
            message: "Validation failed",
            errors,
        }
    }
}

impl IntoResponse for ValidationFailure {
    fn into_response(self) -> Response {
        warn!(errors = ?self.errors, "Validation failed");
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Flattens nested validator errors into dotted field paths
pub fn flatten_errors(prefix: &str, errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut out = Vec::new();
    collect_errors(prefix, errors, &mut out);
    out
}

fn collect_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldIssue>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(FieldIssue::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(&format!("{}.{}", path, index), inner, out);
                }
            }
        }
    }
}

/// Unparsed sections of an incoming request
#[derive(Debug, Default, Clone)]
pub struct RawRequest {
    body: Option<Value>,
    body_error: Option<String>,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
}

impl RawRequest {
    pub fn new(
        body: &[u8],
        params: HashMap<String, String>,
        query: HashMap<String, String>,
    ) -> Self {
        // a missing body is validated as an empty object
        let (body, body_error) = if body.iter().all(u8::is_ascii_whitespace) {
            (Some(Value::Object(Map::new())), None)
        } else {
            match serde_json::from_slice::<Value>(body) {
                Ok(value) => (Some(value), None),
                Err(e) => (None, Some(format!("Invalid JSON body: {}", e))),
            }
        };

        Self {
            body,
            body_error,
            params,
            query,
        }
    }

    pub fn body<T: DeserializeOwned>(&self) -> Result<T, FieldIssue> {
        match (&self.body, &self.body_error) {
            (Some(value), _) => {
                serde_json::from_value(value.clone()).map_err(|e| FieldIssue::new("body", e.to_string()))
            }
            (None, Some(error)) => Err(FieldIssue::new("body", error.clone())),
            (None, None) => Err(FieldIssue::new("body", "Required")),
        }
    }

    /// String fields of the body explicitly set to `null`; these are type
    /// errors, not absent fields
    pub fn body_nulls(&self, fields: &[&str]) -> Vec<FieldIssue> {
        let Some(Value::Object(map)) = &self.body else {
            return Vec::new();
        };
        fields
            .iter()
            .filter(|field| map.get(**field).is_some_and(Value::is_null))
            .map(|field| FieldIssue::new(format!("body.{}", field), "Expected string, received null"))
            .collect()
    }

    pub fn params<T: DeserializeOwned>(&self) -> Result<T, FieldIssue> {
        Self::from_strings("params", &self.params)
    }

    pub fn query<T: DeserializeOwned>(&self) -> Result<T, FieldIssue> {
        Self::from_strings("query", &self.query)
    }

    fn from_strings<T: DeserializeOwned>(
        section: &str,
        values: &HashMap<String, String>,
    ) -> Result<T, FieldIssue> {
        let object: Map<String, Value> = values
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        serde_json::from_value(Value::Object(object))
            .map_err(|e| FieldIssue::new(section, e.to_string()))
    }
}

/// Issues for one parsed section: its parse failure, or its constraint violations
pub fn section_issues<T: Validate>(section: &str, parsed: &Result<T, FieldIssue>) -> Vec<FieldIssue> {
    match parsed {
        Ok(value) => match value.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => flatten_errors(section, &errors),
        },
        Err(issue) => vec![issue.clone()],
    }
}

/// Declarative description of what a route accepts.
///
/// `from_raw` assembles the typed sections; constraints on them are declared
/// with `validator` attributes and checked by the gate afterwards.
pub trait RequestSchema: Validate + Sized {
    fn from_raw(raw: &RawRequest) -> Result<Self, Vec<FieldIssue>>;
}

/// Runs the schema against a raw request
pub fn check<S: RequestSchema>(raw: &RawRequest) -> Result<S, ValidationFailure> {
    let schema = S::from_raw(raw).map_err(ValidationFailure::new)?;
    match schema.validate() {
        Ok(()) => Ok(schema),
        Err(errors) => Err(ValidationFailure::new(flatten_errors("", &errors))),
    }
}

/// Extractor wrapping a request that passed its schema
#[derive(Debug)]
pub struct Validated<S>(pub S);

impl<S, St> FromRequest<St> for Validated<S>
where
    S: RequestSchema + Send,
    St: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let params = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();
        let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|rejection| {
                AppError::new(rejection.status(), rejection.body_text()).into_response()
            })?;

        let raw = RawRequest::new(&bytes, params, query);
        let schema = check::<S>(&raw).map_err(IntoResponse::into_response)?;
        debug!("Request passed validation");
        Ok(Validated(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Inner {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
        #[validate(required(message = "Required"))]
        tag: Option<String>,
    }

    #[derive(Debug, Deserialize, Validate)]
    #[serde(deny_unknown_fields)]
    struct Strict {
        #[validate(length(min = 2))]
        code: Option<String>,
    }

    #[derive(Debug, Validate)]
    struct Schema {
        #[validate(nested)]
        body: Inner,
    }

    impl RequestSchema for Schema {
        fn from_raw(raw: &RawRequest) -> Result<Self, Vec<FieldIssue>> {
            raw.body::<Inner>()
                .map(|body| Schema { body })
                .map_err(|issue| vec![issue])
        }
    }

    fn raw(body: &str) -> RawRequest {
        RawRequest::new(body.as_bytes(), HashMap::new(), HashMap::new())
    }

    #[test]
    fn test_nested_errors_use_dotted_paths() {
        let failure = check::<Schema>(&raw(r#"{"name": "ab"}"#)).unwrap_err();
        let fields: Vec<&str> = failure.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["body.name", "body.tag"]);
        assert_eq!(failure.errors[0].message, "too short");
        assert_eq!(failure.errors[1].message, "Required");
        assert_eq!(failure.message, "Validation failed");
    }

    #[test]
    fn test_valid_request_passes_through() {
        let schema = check::<Schema>(&raw(r#"{"name": "abc", "tag": "t"}"#)).unwrap();
        assert_eq!(schema.body.name, "abc");
    }

    #[test]
    fn test_empty_body_is_an_empty_object() {
        let parsed = raw("").body::<Strict>().unwrap();
        assert!(parsed.code.is_none());
    }

    #[test]
    fn test_malformed_json_reports_body() {
        let issue = raw("{not json").body::<Strict>().unwrap_err();
        assert_eq!(issue.field, "body");
        assert!(issue.message.starts_with("Invalid JSON body"));
    }

    #[test]
    fn test_unknown_key_rejected_in_strict_section() {
        let issue = raw(r#"{"code": "ok", "extra": 1}"#).body::<Strict>().unwrap_err();
        assert_eq!(issue.field, "body");
        assert!(issue.message.contains("extra"));
    }

    #[test]
    fn test_section_issues_prefixes_constraint_failures() {
        let parsed = raw(r#"{"code": "x"}"#).body::<Strict>();
        let issues = section_issues("body", &parsed);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "body.code");
    }

    #[test]
    fn test_params_are_read_as_strings() {
        #[derive(Deserialize)]
        struct Params {
            id: String,
        }
        let mut params = HashMap::new();
        params.insert("id".to_string(), "42".to_string());
        let raw = RawRequest::new(b"", params, HashMap::new());
        assert_eq!(raw.params::<Params>().unwrap().id, "42");
    }
}
