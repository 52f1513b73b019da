//! Upstream domain types
//!
//! An upstream is a logical backend group identified by namespace/name. The
//! translator derives exactly one cluster name per upstream; endpoint
//! discovery itself happens elsewhere.

use serde::{Deserialize, Serialize};

use super::destination::WeightedDestination;
use super::reference::ResourceRef;

/// A logical backend group. Becomes one cluster in the proxy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upstream {
    pub metadata: ResourceRef,
    pub upstream_type: UpstreamType,
}

impl Upstream {
    /// Subset spec carried by this upstream, if the upstream type supports
    /// subsetting.
    pub fn subset_spec(&self) -> Option<&SubsetSpec> {
        match &self.upstream_type {
            UpstreamType::Static { .. } => None,
            UpstreamType::Service { subset_spec, .. } => subset_spec.as_ref(),
        }
    }
}

/// How an upstream's endpoints are obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UpstreamType {
    /// A fixed list of hosts
    Static { hosts: Vec<StaticHost> },

    /// Endpoints discovered from a service registry
    Service {
        service_name: String,
        service_namespace: String,
        service_port: u32,
        #[serde(default)]
        subset_spec: Option<SubsetSpec>,
    },
}

/// One member of a static upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticHost {
    pub address: String,
    pub port: u32,
}

/// Label-based partitioning of an upstream's endpoints.
///
/// Each selector names the label keys of one partition dimension. A route
/// destination may pin to a subset only if some selector's key set equals the
/// subset's key set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetSpec {
    pub selectors: Vec<Selector>,
}

/// One partition dimension of a subset spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    pub keys: Vec<String>,
}

/// A named, ordered list of weighted destinations that routes can reference
/// as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamGroup {
    pub metadata: ResourceRef,
    pub destinations: Vec<WeightedDestination>,
}
