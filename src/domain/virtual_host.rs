//! Virtual host domain types

use serde::{Deserialize, Serialize};

use super::route::{HeaderManipulation, Route};

/// A set of routes sharing a domain list.
///
/// An empty domain list compiles to the catch-all `["*"]`. Route order is
/// significant and preserved by the translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualHost {
    pub name: String,

    #[serde(default)]
    pub domains: Vec<String>,

    #[serde(default)]
    pub routes: Vec<Route>,

    #[serde(default)]
    pub options: Option<VirtualHostOptions>,
}

/// Virtual-host level options consumed by the built-in plugins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VirtualHostOptions {
    #[serde(default)]
    pub headers: Option<HeaderManipulation>,
}
