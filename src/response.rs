//! The decoded reply of a GraphQL call, in as raw a form as possible.
//!
//! Github answers with a JSON mapping holding a `data` entry, an `errors`
//! entry, or both. [`Response`] keeps that mapping untouched and only layers
//! a few accessors on top, so callers can always fall back to the raw
//! [`Value`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single error as reported inside a syntactically valid GraphQL reply.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GraphQlError {
    /// The human-readable message.
    #[serde(default = "GraphQlError::fallback_message")]
    pub message: String,
    /// Where in the query document the error arose.
    #[serde(default)]
    pub locations: Vec<Location>,
    /// The path to the offending field, if the server reported one.
    #[serde(default)]
    pub path: Option<Value>,
    /// Extra server-specific metadata, e.g. Github's `undefinedField` codes.
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphQlError {
    /// What Github reports when an error object carries no message of its own.
    fn fallback_message() -> String {
        "GraphQL Error".to_string()
    }

    pub(crate) fn fallback() -> GraphQlError {
        GraphQlError {
            message: GraphQlError::fallback_message(),
            locations: Vec::new(),
            path: None,
            extensions: None,
        }
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(loc) = self.locations.first() {
            write!(f, " (line {}, column {})", loc.line, loc.column)?;
        }
        Ok(())
    }
}

/// A line/column position within a query document, both 1-indexed.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct Location {
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

/// The full, unreshaped JSON mapping that the server answered with.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Response(Value);

impl Response {
    /// The `data` entry, if the reply has one.
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    /// The `errors` entry parsed into structured form, if the reply has one.
    ///
    /// Error objects that don't follow the standard shape are kept anyway,
    /// with missing fields filled by their defaults.
    pub fn errors(&self) -> Option<Vec<GraphQlError>> {
        let raw = self.0.get("errors")?;
        serde_json::from_value(raw.clone()).ok()
    }

    /// Does the reply carry a top-level `errors` entry at all?
    pub fn has_errors(&self) -> bool {
        self.0.get("errors").is_some()
    }

    /// Fetch a value from deep within the `data` mapping via a dotted path,
    /// with numeric segments indexing into arrays:
    ///
    /// ```
    /// # use serde_json::json;
    /// let reply = hubql::Response::from(json!({
    ///     "data": { "viewer": { "login": "kwk" } }
    /// }));
    /// assert_eq!(reply.get("viewer.login"), Some(&json!("kwk")));
    /// assert_eq!(reply.get("viewer.name"), None);
    /// ```
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut curr = self.data()?;
        for key in path.split('.') {
            curr = match curr {
                Value::Object(map) => map.get(key)?,
                Value::Array(list) => list.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(curr)
    }

    /// The first reported error, or a placeholder when the `errors` entry
    /// exists but can't be parsed. `None` when the reply has no errors.
    pub(crate) fn first_error(&self) -> Option<GraphQlError> {
        let raw = self.0.get("errors")?;
        let parsed: Option<Vec<GraphQlError>> = serde_json::from_value(raw.clone()).ok();
        let first = parsed.and_then(|mut errors| {
            if errors.is_empty() {
                None
            } else {
                Some(errors.remove(0))
            }
        });
        Some(first.unwrap_or_else(GraphQlError::fallback))
    }

    /// A view of the untouched mapping.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Surrender the untouched mapping.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Response {
    fn from(value: Value) -> Response {
        Response(value)
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Value {
        response.0
    }
}

impl PartialEq<Value> for Response {
    fn eq(&self, other: &Value) -> bool {
        &self.0 == other
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested() -> Response {
        Response::from(json!({
            "data": { "status": { "item": { "id": "123" } } }
        }))
    }

    #[test]
    fn dotted_get() {
        let reply = nested();
        assert_eq!(reply.get("status.item.id"), Some(&json!("123")));
        assert_eq!(reply.get("status.item.id2"), None);
        assert_eq!(reply.get("status.item.id.too.deep"), None);
    }

    #[test]
    fn dotted_get_array_index() {
        let reply = Response::from(json!({
            "data": { "nodes": [ { "login": "kwk" } ] }
        }));
        assert_eq!(reply.get("nodes.0.login"), Some(&json!("kwk")));
        assert_eq!(reply.get("nodes.1.login"), None);
        assert_eq!(reply.get("nodes.first.login"), None);
    }

    #[test]
    fn data_and_errors_absent() {
        let reply = Response::from(json!({}));
        assert_eq!(reply.data(), None);
        assert!(reply.errors().is_none());
        assert!(!reply.has_errors());
        assert_eq!(reply.first_error(), None);
    }

    #[test]
    fn errors_parse() {
        let reply = Response::from(json!({
            "errors": [{
                "message": "Field 'MADEUPFIELD' doesn't exist on type 'User'",
                "locations": [{ "line": 1, "column": 19 }],
                "path": ["query", "viewer", "MADEUPFIELD"],
                "extensions": { "code": "undefinedField" }
            }]
        }));

        let errors = reply.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Field 'MADEUPFIELD' doesn't exist on type 'User'"
        );
        assert_eq!(errors[0].locations[0], Location { line: 1, column: 19 });
    }

    #[test]
    fn first_error_fallback_message() {
        // Github has been seen answering with bare error objects.
        let reply = Response::from(json!({ "errors": [{}] }));
        let first = reply.first_error().unwrap();
        assert_eq!(first.message, "GraphQL Error");

        // An empty list still counts as "errors present".
        let reply = Response::from(json!({ "errors": [] }));
        assert!(reply.has_errors());
        assert_eq!(reply.first_error().unwrap().message, "GraphQL Error");
    }

    #[test]
    fn untouched_mapping() {
        let raw = json!({ "data": { "viewer": { "login": "kwk" } } });
        let reply = Response::from(raw.clone());
        assert_eq!(reply, raw);
        assert_eq!(reply.into_value(), raw);
    }
}
