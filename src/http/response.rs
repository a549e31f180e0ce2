//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn a handler `Outcome` into an HTTP response
//! - Re-apply the deployment base path to redirect targets
//!
//! # Design Decisions
//! - Views are serialised as `{"view": name, "data": ...}`; templates live elsewhere
//! - Redirects after form posts use 303 See Other

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};

/// What a handler produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A named view with its data.
    View { name: &'static str, data: Value },
    Json(Value),
    /// A record was created; body is the record.
    Created(Value),
    /// App-relative location, without the base path.
    Redirect(String),
}

impl Outcome {
    pub fn view(name: &'static str, data: Value) -> Self {
        Self::View { name, data }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect(location.into())
    }

    pub fn into_http(self, base_path: &str) -> Response {
        match self {
            Self::View { name, data } => Json(json!({ "view": name, "data": data })).into_response(),
            Self::Json(value) => Json(value).into_response(),
            Self::Created(value) => (StatusCode::CREATED, Json(value)).into_response(),
            Self::Redirect(location) => Redirect::to(&format!("{base_path}{location}")).into_response(),
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::View { .. } => "view",
            Self::Json(_) => "json",
            Self::Created(_) => "created",
            Self::Redirect(_) => "redirect",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_redirect_keeps_base_path() {
        let response = Outcome::redirect("/leases/3").into_http("/rental");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/rental/leases/3");
    }

    #[test]
    fn test_created_status() {
        let response = Outcome::Created(json!({ "id": 1 })).into_http("");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_view_is_ok() {
        let response = Outcome::view("shops/index", json!([])).into_http("");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
