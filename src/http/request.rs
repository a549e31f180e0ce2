//! Request handling and transformation.
//!
//! # Responsibilities
//! - Strip the deployment base path before routing
//! - Decode query string and form/JSON body into plain string fields
//! - Carry the request ID into handlers and logs
//!
//! # Design Decisions
//! - Base path is stripped once, on a segment boundary only
//! - Paths outside the base path never reach the router
//! - Field values stay strings; handlers parse what they need

use std::collections::HashMap;

use serde_json::Value;

use crate::http::error::AppError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Everything a handler may read about the inbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: String,
    /// Path after base-path stripping, without the query string.
    pub path: String,
    pub request_id: String,
    query: Vec<(String, String)>,
    fields: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Decode a urlencoded or JSON object body into fields.
    ///
    /// Other content types are ignored; the handlers only take forms.
    pub fn with_body(mut self, content_type: Option<&str>, body: &[u8]) -> Result<Self, AppError> {
        if body.is_empty() {
            return Ok(self);
        }

        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("application/x-www-form-urlencoded") => {
                self.fields
                    .extend(url::form_urlencoded::parse(body).into_owned());
            }
            Some("application/json") => {
                let value: Value = serde_json::from_slice(body)
                    .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))?;
                let Value::Object(map) = value else {
                    return Err(AppError::BadRequest("JSON body must be an object".into()));
                };
                for (name, value) in map {
                    let text = match value {
                        Value::Null => continue,
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    self.fields.insert(name, text);
                }
            }
            _ => {}
        }
        Ok(self)
    }

    /// First query value for `name`.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Body field `name`, if present and non-empty.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Body field `name`, or a 400 naming the missing field.
    pub fn require(&self, name: &str) -> Result<&str, AppError> {
        self.field(name)
            .ok_or_else(|| AppError::BadRequest(format!("missing field `{name}`")))
    }
}

/// Remove the deployment prefix from `path`.
///
/// Returns `None` when the path lies outside the base path. The base itself
/// maps to `/`. Trailing slashes are left alone.
pub fn strip_base_path<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_base_path() {
        assert_eq!(strip_base_path("", "/shops"), Some("/shops"));
        assert_eq!(strip_base_path("/rental", "/rental/shops"), Some("/shops"));
        assert_eq!(strip_base_path("/rental", "/rental"), Some("/"));
        assert_eq!(strip_base_path("/rental", "/rental/"), Some("/"));
        assert_eq!(strip_base_path("/rental", "/rental/shops/"), Some("/shops/"));
        // Segment boundary only.
        assert_eq!(strip_base_path("/rental", "/rentals/shops"), None);
        assert_eq!(strip_base_path("/rental", "/shops"), None);
        // Stripped once.
        assert_eq!(
            strip_base_path("/rental", "/rental/rental/shops"),
            Some("/rental/shops")
        );
    }

    #[test]
    fn test_query_is_decoded() {
        let req = RequestContext::new("GET", "/shops").with_query("status=available&floor=2&q=a%20b");
        assert_eq!(req.query("status"), Some("available"));
        assert_eq!(req.query("q"), Some("a b"));
        assert_eq!(req.query("missing"), None);
    }

    #[test]
    fn test_form_body() {
        let req = RequestContext::new("POST", "/tickets")
            .with_body(
                Some("application/x-www-form-urlencoded; charset=UTF-8"),
                b"title=Leaky+tap&priority=high&description=",
            )
            .unwrap();
        assert_eq!(req.field("title"), Some("Leaky tap"));
        assert_eq!(req.field("priority"), Some("high"));
        assert_eq!(req.field("description"), None);
        assert!(req.require("description").is_err());
    }

    #[test]
    fn test_json_body() {
        let req = RequestContext::new("POST", "/invoices/1/pay")
            .with_body(
                Some("application/json"),
                br#"{"amount_cents": 1500, "method": "card", "note": null}"#,
            )
            .unwrap();
        assert_eq!(req.field("amount_cents"), Some("1500"));
        assert_eq!(req.field("method"), Some("card"));
        assert_eq!(req.field("note"), None);
    }

    #[test]
    fn test_bad_json_body() {
        let err = RequestContext::new("POST", "/x")
            .with_body(Some("application/json"), b"[1, 2]")
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
