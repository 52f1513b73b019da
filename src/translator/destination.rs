//! Destination resolver
//!
//! Resolves user destination references to canonical cluster names plus
//! optional subset metadata, and validates that the referenced upstreams
//! exist and can satisfy any requested subset.

use std::collections::BTreeMap;

use envoy_types::pb::envoy::config::core::v3::Metadata;
use envoy_types::pb::google::protobuf::{value, Struct, Value};

use crate::domain::{Destination, DestinationType, RouteAction, Snapshot, WeightedDestination};
use crate::translator::plugins::Params;
use crate::translator::TranslationError;

/// Filter key under which the proxy's subset load balancer reads route
/// metadata.
const ENVOY_LB_FILTER: &str = "envoy.lb";

/// Check that every upstream referenced by `action` exists in the snapshot.
pub(crate) fn validate_route_destinations(
    snapshot: &Snapshot,
    action: &RouteAction,
) -> Result<(), TranslationError> {
    match &action.destination {
        DestinationType::Single(dest) => validate_single_destination(snapshot, dest),
        DestinationType::Multi(multi) => validate_multi_destination(snapshot, &multi.destinations),
        DestinationType::UpstreamGroup(group_ref) => {
            let group = snapshot
                .upstream_group(group_ref)
                .ok_or_else(|| TranslationError::UpstreamGroupNotFound(group_ref.clone()))?;
            validate_multi_destination(snapshot, &group.destinations)
        }
    }
}

fn validate_multi_destination(
    snapshot: &Snapshot,
    destinations: &[WeightedDestination],
) -> Result<(), TranslationError> {
    for weighted in destinations {
        validate_single_destination(snapshot, &weighted.destination)
            .map_err(|err| TranslationError::InvalidWeightedDestination(Box::new(err)))?;
    }
    Ok(())
}

fn validate_single_destination(
    snapshot: &Snapshot,
    destination: &Destination,
) -> Result<(), TranslationError> {
    snapshot
        .upstream(&destination.upstream)
        .map(|_| ())
        .ok_or_else(|| TranslationError::UpstreamNotFound(destination.upstream.clone()))
}

/// Subset metadata for the route action, if the destination pins a subset.
pub(crate) fn subset_metadata(destination: &Destination) -> Option<Metadata> {
    let subset = destination.subset.as_ref()?;
    if subset.values.is_empty() {
        return None;
    }
    Some(lb_metadata(&subset.values))
}

fn lb_metadata(values: &BTreeMap<String, String>) -> Metadata {
    let fields = values
        .iter()
        .map(|(key, val)| {
            (key.clone(), Value { kind: Some(value::Kind::StringValue(val.clone())) })
        })
        .collect();

    Metadata {
        filter_metadata: std::iter::once((ENVOY_LB_FILTER.to_string(), Struct { fields }))
            .collect(),
        ..Default::default()
    }
}

/// Check that the destination's subset is satisfiable by the targeted
/// upstream: some selector's key set must equal the subset's key set.
pub(crate) fn check_subset_matches_upstream(
    params: Params<'_>,
    destination: &Destination,
) -> Result<(), TranslationError> {
    let Some(subset) = destination.subset.as_ref() else {
        return Ok(());
    };
    if subset.values.is_empty() {
        return Ok(());
    }

    let upstream = params
        .snapshot
        .upstream(&destination.upstream)
        .ok_or_else(|| TranslationError::UpstreamNotFound(destination.upstream.clone()))?;

    let Some(spec) = upstream.subset_spec() else {
        return Err(TranslationError::SubsetsMisconfigured(destination.upstream.clone()));
    };

    let found = spec.selectors.iter().any(|selector| {
        selector.keys.len() == subset.values.len()
            && selector.keys.iter().all(|key| subset.values.contains_key(key))
    });

    if found {
        Ok(())
    } else {
        Err(TranslationError::SubsetsNotMatched(destination.upstream.clone()))
    }
}
