//! Route destination types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::reference::ResourceRef;
use super::route::WeightedDestinationOptions;

/// Where a route action sends traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DestinationType {
    /// A single upstream
    Single(Destination),

    /// An ordered list of weighted upstreams
    Multi(MultiDestination),

    /// A named upstream group resolved from the snapshot
    UpstreamGroup(ResourceRef),
}

/// A single upstream reference, optionally pinned to an endpoint subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub upstream: ResourceRef,
    #[serde(default)]
    pub subset: Option<Subset>,
}

/// Label values selecting a partition of the target upstream's endpoints.
///
/// Values are kept in a `BTreeMap` so that emitted subset metadata is
/// deterministic for a given snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subset {
    pub values: BTreeMap<String, String>,
}

/// An ordered list of weighted destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiDestination {
    pub destinations: Vec<WeightedDestination>,
}

/// One entry of a multi destination or upstream group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedDestination {
    pub destination: Destination,
    pub weight: u32,
    #[serde(default)]
    pub options: Option<WeightedDestinationOptions>,
}
