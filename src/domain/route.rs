//! Route domain types
//!
//! A route pairs an ordered list of matchers with an action. Options carry
//! the cross-cutting knobs (rewrites, header manipulation) that built-in
//! plugins lower onto the proxy route.

use serde::{Deserialize, Serialize};

use super::destination::DestinationType;
use super::matcher::Matcher;

/// A (matchers, action) pair within a virtual host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Display name; emitted proxy routes are suffixed with the matcher index
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub matchers: Vec<Matcher>,

    pub action: Action,

    #[serde(default)]
    pub options: Option<RouteOptions>,
}

/// What the proxy does with a matched request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Forward to one or more upstreams
    Route(RouteAction),

    /// Answer directly with a fixed status and body
    DirectResponse(DirectResponseAction),

    /// Redirect the client
    Redirect(RedirectAction),
}

/// Forwarding action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAction {
    pub destination: DestinationType,
}

/// Fixed response served without contacting any upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectResponseAction {
    pub status: u32,
    #[serde(default)]
    pub body: String,
}

/// Client redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectAction {
    #[serde(default)]
    pub host_redirect: String,

    /// Redirect status code (301, 302, 303, 307, 308)
    #[serde(default)]
    pub response_code: u32,

    #[serde(default)]
    pub https_redirect: bool,

    #[serde(default)]
    pub strip_query: bool,

    /// At most one path rewrite is applied to the redirect target
    #[serde(default)]
    pub path_rewrite: Option<PathRewrite>,
}

/// How a redirect rewrites the request path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathRewrite {
    /// Replace the whole path
    PathRedirect(String),

    /// Replace only the matched prefix
    PrefixRewrite(String),
}

/// Per-route options consumed by the built-in plugins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteOptions {
    #[serde(default)]
    pub host_rewrite: Option<HostRewrite>,

    #[serde(default)]
    pub prefix_rewrite: Option<String>,

    #[serde(default)]
    pub headers: Option<HeaderManipulation>,
}

/// Host header rewrite applied on the way upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostRewrite {
    /// Rewrite to a fixed value
    Host(String),

    /// Rewrite to the hostname of the selected upstream endpoint
    Auto,
}

/// Request/response header mutations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeaderManipulation {
    #[serde(default)]
    pub request_headers_to_add: Vec<HeaderValue>,
    #[serde(default)]
    pub request_headers_to_remove: Vec<String>,
    #[serde(default)]
    pub response_headers_to_add: Vec<HeaderValue>,
    #[serde(default)]
    pub response_headers_to_remove: Vec<String>,
}

impl HeaderManipulation {
    pub fn is_empty(&self) -> bool {
        self.request_headers_to_add.is_empty()
            && self.request_headers_to_remove.is_empty()
            && self.response_headers_to_add.is_empty()
            && self.response_headers_to_remove.is_empty()
    }
}

/// One header mutation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderValue {
    pub key: String,
    #[serde(default)]
    pub value: String,
    /// Append to an existing header instead of overwriting it
    #[serde(default)]
    pub append: bool,
}

/// Options on one weighted destination entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedDestinationOptions {
    #[serde(default)]
    pub headers: Option<HeaderManipulation>,
}
