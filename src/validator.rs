//! Request parameter collection and required-field validation.
//!
//! Every endpoint sees a single [`RequestParams`] object: the query string for
//! `GET`, the JSON body otherwise, with path captures merged on top. Validation
//! only checks that each required name is present as a key; values are never
//! inspected or coerced.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::Uri;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use scoreboard_core::AppError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams(Map<String, Value>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a request body. An empty body is an empty parameter set; any
    /// other payload must be a JSON object.
    pub fn from_body(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Err(AppError::malformed_request()),
        }
    }

    /// Decodes the query string of `uri`. All values are strings.
    pub fn from_query(uri: &Uri) -> Result<Self, AppError> {
        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(uri)
            .map_err(|_| AppError::malformed_request())?;

        Ok(Self(
            query
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        ))
    }

    /// Path captures win over body keys of the same name.
    pub fn merge_path<I, K, V>(&mut self, captures: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in captures {
            self.0.insert(key.into(), Value::String(value.into()));
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Whether `name` is present. A dotted name is tried as a literal key
    /// first, then as a path into nested objects.
    pub fn contains(&self, name: &str) -> bool {
        if self.0.contains_key(name) {
            return true;
        }
        if !name.contains('.') {
            return false;
        }

        let mut segments = name.split('.');
        let Some(first) = segments.next() else {
            return false;
        };
        let mut current = match self.0.get(first) {
            Some(value) => value,
            None => return false,
        };
        for segment in segments {
            match current.as_object().and_then(|map| map.get(segment)) {
                Some(next) => current = next,
                None => return false,
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes the parameters into a typed DTO.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|_| AppError::malformed_request())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Fails with `MalformedRequest` unless every name in `required` is present.
pub fn validate_required(params: &RequestParams, required: &[&str]) -> Result<(), AppError> {
    if required.iter().all(|name| params.contains(name)) {
        Ok(())
    } else {
        Err(AppError::malformed_request())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoreboard_core::ErrorKind;
    use serde_json::json;

    fn params(value: Value) -> RequestParams {
        match value {
            Value::Object(map) => RequestParams::from(map),
            _ => panic!("test params must be an object"),
        }
    }

    #[test]
    fn test_presence_ignores_values() {
        let p = params(json!({"email": "", "password": null, "rounds": []}));
        assert!(validate_required(&p, &["email", "password", "rounds"]).is_ok());
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let p = params(json!({"email": "a@b.com"}));
        let err = validate_required(&p, &["email", "password"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
        assert_eq!(err.message(), "Malformed request body");
    }

    #[test]
    fn test_no_required_fields_accepts_empty_set() {
        assert!(validate_required(&RequestParams::new(), &[]).is_ok());
    }

    #[test]
    fn test_dotted_names_resolve_nested_then_literal() {
        let nested = params(json!({"name": {"first": "Ada"}}));
        assert!(nested.contains("name.first"));
        assert!(!nested.contains("name.last"));

        let literal = params(json!({"name.first": "Ada"}));
        assert!(literal.contains("name.first"));

        let scalar = params(json!({"name": "Ada"}));
        assert!(!scalar.contains("name.first"));
    }

    #[test]
    fn test_from_body_shapes() {
        assert!(RequestParams::from_body(b"").unwrap().is_empty());
        assert!(RequestParams::from_body(b"  \n").unwrap().is_empty());
        assert_eq!(RequestParams::from_body(br#"{"a":1}"#).unwrap().len(), 1);

        for bad in [&b"[1,2]"[..], b"\"text\"", b"{not json"] {
            let err = RequestParams::from_body(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedRequest);
        }
    }

    #[test]
    fn test_from_query_yields_strings() {
        let uri: Uri = "/competition?limit=10&name=Finals".parse().unwrap();
        let p = RequestParams::from_query(&uri).unwrap();
        assert_eq!(p.get("limit"), Some(&json!("10")));
        assert_eq!(p.get_str("name"), Some("Finals"));

        let bare: Uri = "/competition".parse().unwrap();
        assert!(RequestParams::from_query(&bare).unwrap().is_empty());
    }

    #[test]
    fn test_path_captures_override_body() {
        let mut p = params(json!({"id": "from-body", "name": "n"}));
        p.merge_path([("id", "from-path")]);
        assert_eq!(p.get_str("id"), Some("from-path"));
        assert_eq!(p.get_str("name"), Some("n"));
    }

    #[test]
    fn test_parse_maps_type_errors_to_malformed() {
        #[derive(Debug, serde::Deserialize)]
        struct Login {
            #[allow(dead_code)]
            email: String,
        }

        let ok = params(json!({"email": "a@b.com"}));
        assert!(ok.parse::<Login>().is_ok());

        let bad = params(json!({"email": 42}));
        assert_eq!(
            bad.parse::<Login>().unwrap_err().kind,
            ErrorKind::MalformedRequest
        );
    }
}
