//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Parse `{name}` placeholders out of a route pattern
//! - Compile `"<METHOD> <pattern>"` into an anchored regex over the whole key
//! - Capture exactly one path segment per placeholder
//!
//! # Design Decisions
//! - Literal text is escaped; only placeholders become captures
//! - A capture never crosses a `/` boundary
//! - Repeated placeholder names are rejected at compile time
//! - Compiled once at startup, never in the request path

use regex::Regex;

use crate::routing::router::PathParams;

/// Errors raised while compiling a single route pattern.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern `{pattern}` has an unclosed `{{` placeholder")]
    UnclosedPlaceholder { pattern: String },

    #[error("pattern `{pattern}` has a `}}` without a matching `{{`")]
    UnexpectedBrace { pattern: String },

    #[error("pattern `{pattern}` has an invalid placeholder name `{name}`")]
    InvalidName { pattern: String, name: String },

    #[error("pattern `{pattern}` repeats placeholder `{name}`")]
    DuplicateName { pattern: String, name: String },

    #[error("pattern `{pattern}` failed to compile: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    names: Vec<String>,
    regex: Regex,
}

impl RoutePattern {
    /// Compile the pattern for `method`.
    ///
    /// The resulting expression matches the composite key `"<METHOD> <path>"`,
    /// so a method mismatch is simply a failed match.
    pub fn compile(method: &str, pattern: &str) -> Result<Self, PatternError> {
        let mut expr = format!("^{} ", regex::escape(method));
        let mut names: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(PatternError::UnclosedPlaceholder {
                            pattern: pattern.to_string(),
                        });
                    }
                    if !is_identifier(&name) {
                        return Err(PatternError::InvalidName {
                            pattern: pattern.to_string(),
                            name,
                        });
                    }
                    if names.contains(&name) {
                        return Err(PatternError::DuplicateName {
                            pattern: pattern.to_string(),
                            name,
                        });
                    }

                    expr.push_str(&regex::escape(&literal));
                    literal.clear();
                    expr.push_str("([^/]+)");
                    names.push(name);
                }
                '}' => {
                    return Err(PatternError::UnexpectedBrace {
                        pattern: pattern.to_string(),
                    })
                }
                other => literal.push(other),
            }
        }

        expr.push_str(&regex::escape(&literal));
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { names, regex })
    }

    /// Placeholder names in the order they appear.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True if the pattern has no placeholders.
    pub fn is_literal(&self) -> bool {
        self.names.is_empty()
    }

    /// Match a composite key, zipping captures with placeholder names.
    pub fn captures(&self, key: &str) -> Option<PathParams> {
        let caps = self.regex.captures(key)?;
        let params = self
            .names
            .iter()
            .zip(caps.iter().skip(1))
            .filter_map(|(name, value)| value.map(|v| (name.clone(), v.as_str().to_string())))
            .collect();
        Some(params)
    }
}

/// Placeholder names and handler identifiers share one grammar.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
