//! Route table construction and lookup.
//!
//! # Responsibilities
//! - Parse `"<METHOD> <pattern>"` keys and `Target.operation` handler refs
//! - Store compiled routes in registration order
//! - Resolve a request to a handler ref plus path parameters, or NotFound
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Literal routes live in a HashMap: O(1) exact lookup that always wins
//! - Parameterised routes are scanned in registration order, first match wins
//! - No trailing-slash normalisation: `/shops` and `/shops/` are distinct

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::routing::matcher::{is_identifier, PatternError, RoutePattern};

/// Errors raised while building a route table.
#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("route key `{key}` must be `<METHOD> <path>`")]
    MalformedKey { key: String },

    #[error("route key `{key}` has invalid method `{method}`")]
    InvalidMethod { key: String, method: String },

    #[error("route key `{key}` has a path that does not start with `/`")]
    InvalidPath { key: String },

    #[error("route `{key}` has invalid handler `{handler}` (expected `Target.operation`)")]
    InvalidHandler { key: String, handler: String },

    #[error("route `{key}` is registered more than once")]
    DuplicateRoute { key: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// No route matched the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no route for {method} {path}")]
pub struct NotFound {
    pub method: String,
    pub path: String,
}

/// A handler reference that is not `Target.operation`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid handler reference `{input}` (expected `Target.operation`)")]
pub struct InvalidHandlerRef {
    pub input: String,
}

/// Names the target and operation that serve a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    target: String,
    operation: String,
}

impl HandlerRef {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl FromStr for HandlerRef {
    type Err = InvalidHandlerRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidHandlerRef { input: s.to_string() };
        let (target, operation) = s.split_once('.').ok_or_else(invalid)?;
        if !is_identifier(target) || !is_identifier(operation) {
            return Err(invalid());
        }
        Ok(Self {
            target: target.to_string(),
            operation: operation.to_string(),
        })
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.operation)
    }
}

/// Path parameters in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Values in placeholder order, for positional use.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A declared route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: String,
    pub pattern: String,
    pub handler: HandlerRef,
}

impl Route {
    /// Parse a composite key (`"GET /shops/{id}"`) and a handler ref.
    pub fn parse(key: &str, handler: &str) -> Result<Self, RouteTableError> {
        let (method, pattern) = key
            .split_once(' ')
            .filter(|(m, p)| !m.is_empty() && !p.is_empty() && !p.contains(char::is_whitespace))
            .ok_or_else(|| RouteTableError::MalformedKey {
                key: key.to_string(),
            })?;

        if !method.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(RouteTableError::InvalidMethod {
                key: key.to_string(),
                method: method.to_string(),
            });
        }
        if !pattern.starts_with('/') {
            return Err(RouteTableError::InvalidPath {
                key: key.to_string(),
            });
        }

        let handler = handler
            .parse::<HandlerRef>()
            .map_err(|e| RouteTableError::InvalidHandler {
                key: key.to_string(),
                handler: e.input,
            })?;

        Ok(Self {
            method: method.to_string(),
            pattern: pattern.to_string(),
            handler,
        })
    }

    /// The composite `"<METHOD> <pattern>"` key.
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.pattern)
    }
}

/// Result of resolving a request against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch {
    pub handler: HandlerRef,
    pub params: PathParams,
}

/// Immutable route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    exact: HashMap<String, HandlerRef>,
    patterns: Vec<(RoutePattern, HandlerRef)>,
}

impl RouteTable {
    /// Build the table from routes in registration order.
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteTableError> {
        let mut seen = HashSet::new();
        let mut exact = HashMap::new();
        let mut patterns = Vec::new();

        for route in &routes {
            let key = route.key();
            if !seen.insert(key.clone()) {
                return Err(RouteTableError::DuplicateRoute { key });
            }

            let pattern = RoutePattern::compile(&route.method, &route.pattern)?;
            if pattern.is_literal() {
                exact.insert(key, route.handler.clone());
            } else {
                patterns.push((pattern, route.handler.clone()));
            }
        }

        tracing::debug!(
            routes = routes.len(),
            exact = exact.len(),
            patterns = patterns.len(),
            "Route table compiled"
        );

        Ok(Self {
            routes,
            exact,
            patterns,
        })
    }

    /// Build the table from `(key, handler)` pairs in registration order.
    pub fn from_pairs<I, K, H>(pairs: I) -> Result<Self, RouteTableError>
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: AsRef<str>,
    {
        let routes = pairs
            .into_iter()
            .map(|(key, handler)| Route::parse(key.as_ref(), handler.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(routes)
    }

    /// Resolve a request.
    ///
    /// `raw_path` must already be stripped of any deployment prefix and of the
    /// query string.
    ///
    /// Only placeholder-free routes take the exact lookup. A request whose
    /// path spells a pattern verbatim (`GET /shops/{id}`) is matched by that
    /// pattern like any other segment, capturing `id = "{id}"`.
    pub fn resolve(&self, method: &str, raw_path: &str) -> Result<ResolvedMatch, NotFound> {
        let key = format!("{method} {raw_path}");

        if let Some(handler) = self.exact.get(&key) {
            return Ok(ResolvedMatch {
                handler: handler.clone(),
                params: PathParams::default(),
            });
        }

        for (pattern, handler) in &self.patterns {
            if let Some(params) = pattern.captures(&key) {
                return Ok(ResolvedMatch {
                    handler: handler.clone(),
                    params,
                });
            }
        }

        Err(NotFound {
            method: method.to_string(),
            path: raw_path.to_string(),
        })
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
