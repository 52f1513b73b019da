//! Request matcher types
//!
//! A matcher is a predicate over an incoming request: a path specifier plus
//! optional header, query-parameter, and method constraints. Matcher order
//! within a route is significant and preserved by the translator.

use serde::{Deserialize, Serialize};

/// Predicate over an incoming request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    /// Exactly one path specifier is expected; a matcher without one is
    /// reported as invalid on the enclosing route.
    #[serde(default)]
    pub path: Option<PathSpecifier>,

    #[serde(default)]
    pub headers: Vec<HeaderMatcher>,

    #[serde(default)]
    pub query_parameters: Vec<QueryParameterMatcher>,

    /// HTTP methods, matched via the `:method` pseudo-header
    #[serde(default)]
    pub methods: Vec<String>,
}

impl Matcher {
    /// A matcher accepting every request path.
    pub fn prefix<S: Into<String>>(prefix: S) -> Self {
        Self {
            path: Some(PathSpecifier::Prefix(prefix.into())),
            headers: Vec::new(),
            query_parameters: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// How the request path is matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathSpecifier {
    /// Exact path match (e.g. "/api/users" matches only "/api/users")
    Exact(String),

    /// Prefix match (e.g. "/api" matches "/api/users")
    Prefix(String),

    /// RE2 regular expression match
    Regex(String),
}

/// Header constraint.
///
/// An empty `value` means presence; otherwise `regex` selects between an RE2
/// match and an exact match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderMatcher {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub regex: bool,
    #[serde(default)]
    pub invert_match: bool,
}

/// Query parameter constraint, with the same empty/regex/exact split as
/// headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameterMatcher {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub regex: bool,
}
