//! Action compiler
//!
//! Lowers each route action (route-to-destination, direct response,
//! redirect) into its proxy counterpart, invoking the matcher compiler and
//! destination resolver, then runs the route-scoped plugin passes.

use std::sync::Arc;

use envoy_types::pb::envoy::config::core::v3::{data_source, DataSource};
use envoy_types::pb::envoy::config::route::v3::{
    redirect_action, route, route_action::ClusterSpecifier, route_match,
    weighted_cluster::ClusterWeight, DirectResponseAction as EnvoyDirectResponseAction,
    RedirectAction as EnvoyRedirectAction, Route as EnvoyRoute,
    RouteAction as EnvoyRouteAction, RouteMatch, WeightedCluster,
};
use envoy_types::pb::google::protobuf::UInt32Value;
use tracing::debug;

use crate::domain::{
    Action, DestinationType, PathRewrite, Route, RouteAction, WeightedDestination,
};
use crate::report::{FindingKind, RouteReport};
use crate::translator::plugins::{RouteActionParams, RouteParams, TranslatorPlugin};
use crate::translator::{destination, matcher, TranslationError};
use crate::utils::cluster_name;

/// Compile one user route into its proxy routes: one output route per
/// declared matcher, or a single catch-all prefix route when the user
/// declared none.
pub(crate) fn envoy_routes(
    plugins: &[Arc<dyn TranslatorPlugin>],
    params: RouteParams<'_>,
    route_report: &mut RouteReport,
    route: &Route,
) -> Vec<EnvoyRoute> {
    let mut out = init_routes(params, route_report, route);

    for envoy_route in &mut out {
        set_action(plugins, params, route_report, route, envoy_route);
    }

    out
}

fn init_routes(
    params: RouteParams<'_>,
    route_report: &mut RouteReport,
    route: &Route,
) -> Vec<EnvoyRoute> {
    if route.matchers.is_empty() {
        return vec![EnvoyRoute {
            r#match: Some(RouteMatch {
                path_specifier: Some(route_match::PathSpecifier::Prefix("/".to_string())),
                ..Default::default()
            }),
            ..Default::default()
        }];
    }

    route
        .matchers
        .iter()
        .enumerate()
        .map(|(idx, user_matcher)| {
            if user_matcher.path.is_none() {
                route_report.append_error(
                    FindingKind::InvalidMatcherError,
                    "no path specifier provided".to_string(),
                );
            }
            let mut envoy_route = EnvoyRoute {
                r#match: Some(matcher::compile_matcher(params.settings(), user_matcher)),
                ..Default::default()
            };
            if let Some(name) = &route.name {
                envoy_route.name = format!("{}-{}", name, idx);
            }
            envoy_route
        })
        .collect()
}

fn set_action(
    plugins: &[Arc<dyn TranslatorPlugin>],
    params: RouteParams<'_>,
    route_report: &mut RouteReport,
    in_route: &Route,
    out: &mut EnvoyRoute,
) {
    match &in_route.action {
        Action::Route(route_action) => {
            if let Err(err) =
                destination::validate_route_destinations(params.snapshot(), route_action)
            {
                route_report
                    .append_warning(FindingKind::InvalidDestinationWarning, err.to_string());
            }

            let mut envoy_action = EnvoyRouteAction::default();
            match set_route_action(plugins, params, route_action, &mut envoy_action, route_report)
            {
                Ok(()) => {}
                Err(err) if err.is_warning() => {
                    route_report
                        .append_warning(FindingKind::InvalidDestinationWarning, err.to_string());
                }
                Err(err @ TranslationError::NoDestinationSpecified) => {
                    route_report
                        .append_error(FindingKind::NoDestinationSpecifiedError, err.to_string());
                }
                Err(err) => {
                    route_report.append_error(FindingKind::ProcessingError, err.to_string());
                }
            }

            if envoy_action.cluster_specifier.is_some() {
                out.action = Some(route::Action::Route(envoy_action));
            } else {
                // No cluster could be derived at all; serve the configured
                // invalid-route response instead of an unroutable action.
                let status = params.settings().invalid_config_policy.invalid_route_response_code;
                debug!(status, "Route destination unresolved; emitting direct response");
                out.action = Some(route::Action::DirectResponse(EnvoyDirectResponseAction {
                    status: status as u32,
                    ..Default::default()
                }));
            }

            for plugin in plugins {
                let Some(route_plugin) = plugin.route_plugin() else {
                    continue;
                };
                if let Err(err) = route_plugin.process_route(&params, in_route, out) {
                    // missing upstreams already produced a warning above
                    if err.is_warning() {
                        continue;
                    }
                    route_report.append_error(
                        FindingKind::ProcessingError,
                        format!("{}: {}", plugin.name(), err),
                    );
                }
            }

            for plugin in plugins {
                let Some(action_plugin) = plugin.route_action_plugin() else {
                    continue;
                };
                // skipped when the emitted action is no longer a route action
                let Some(route::Action::Route(out_action)) = out.action.as_mut() else {
                    break;
                };
                let action_params = RouteActionParams { route_params: params, route: in_route };
                if let Err(err) =
                    action_plugin.process_route_action(&action_params, route_action, out_action)
                {
                    if err.is_warning() {
                        continue;
                    }
                    route_report.append_error(FindingKind::ProcessingError, err.to_string());
                }
            }
        }

        Action::DirectResponse(direct) => {
            out.action = Some(route::Action::DirectResponse(EnvoyDirectResponseAction {
                status: direct.status,
                body: data_source_from_string(&direct.body),
            }));

            // Direct responses support header manipulation and nothing else,
            // so only header-manipulation plugins run here.
            for plugin in plugins {
                let Some(header_plugin) = plugin.header_manipulation_plugin() else {
                    continue;
                };
                if let Err(err) = header_plugin.process_route(&params, in_route, out) {
                    if err.is_warning() {
                        continue;
                    }
                    route_report.append_error(
                        FindingKind::ProcessingError,
                        format!("{}: {}", plugin.name(), err),
                    );
                }
            }
        }

        Action::Redirect(redirect) => {
            let mut envoy_redirect = EnvoyRedirectAction {
                host_redirect: redirect.host_redirect.clone(),
                response_code: redirect_response_code(redirect.response_code) as i32,
                scheme_rewrite_specifier: Some(
                    redirect_action::SchemeRewriteSpecifier::HttpsRedirect(redirect.https_redirect),
                ),
                strip_query: redirect.strip_query,
                ..Default::default()
            };

            match &redirect.path_rewrite {
                Some(PathRewrite::PathRedirect(path)) => {
                    envoy_redirect.path_rewrite_specifier =
                        Some(redirect_action::PathRewriteSpecifier::PathRedirect(path.clone()));
                }
                Some(PathRewrite::PrefixRewrite(prefix)) => {
                    envoy_redirect.path_rewrite_specifier =
                        Some(redirect_action::PathRewriteSpecifier::PrefixRewrite(prefix.clone()));
                }
                None => {}
            }

            out.action = Some(route::Action::Redirect(envoy_redirect));
        }
    }
}

fn set_route_action(
    plugins: &[Arc<dyn TranslatorPlugin>],
    params: RouteParams<'_>,
    in_action: &RouteAction,
    out: &mut EnvoyRouteAction,
    route_report: &mut RouteReport,
) -> Result<(), TranslationError> {
    match &in_action.destination {
        DestinationType::Single(dest) => {
            out.cluster_specifier = Some(ClusterSpecifier::Cluster(cluster_name(&dest.upstream)));
            out.metadata_match = destination::subset_metadata(dest);
            destination::check_subset_matches_upstream(params.vhost.params, dest)
        }
        DestinationType::Multi(multi) => {
            set_weighted_clusters(plugins, params, &multi.destinations, out, route_report)
        }
        DestinationType::UpstreamGroup(group_ref) => {
            let group = params
                .snapshot()
                .upstream_group(group_ref)
                .ok_or_else(|| TranslationError::UpstreamGroupNotFound(group_ref.clone()))?;
            set_weighted_clusters(plugins, params, &group.destinations, out, route_report)
        }
    }
}

#[allow(deprecated)]
fn set_weighted_clusters(
    plugins: &[Arc<dyn TranslatorPlugin>],
    params: RouteParams<'_>,
    destinations: &[WeightedDestination],
    out: &mut EnvoyRouteAction,
    route_report: &mut RouteReport,
) -> Result<(), TranslationError> {
    if destinations.is_empty() {
        return Err(TranslationError::NoDestinationSpecified);
    }

    let mut clusters = Vec::with_capacity(destinations.len());
    let mut total_weight: u32 = 0;

    for weighted in destinations {
        total_weight = total_weight.saturating_add(weighted.weight);

        let mut cluster_weight = ClusterWeight {
            name: cluster_name(&weighted.destination.upstream),
            weight: Some(UInt32Value { value: weighted.weight }),
            metadata_match: destination::subset_metadata(&weighted.destination),
            ..Default::default()
        };

        for plugin in plugins {
            let Some(weighted_plugin) = plugin.weighted_destination_plugin() else {
                continue;
            };
            if let Err(err) =
                weighted_plugin.process_weighted_destination(&params, weighted, &mut cluster_weight)
            {
                route_report.append_error(FindingKind::ProcessingError, err.to_string());
            }
        }

        clusters.push(cluster_weight);

        // each entry resolves independently; a bad subset never blocks its siblings
        if let Err(err) =
            destination::check_subset_matches_upstream(params.vhost.params, &weighted.destination)
        {
            route_report.append_warning(FindingKind::InvalidDestinationWarning, err.to_string());
        }
    }

    out.cluster_specifier = Some(ClusterSpecifier::WeightedClusters(WeightedCluster {
        clusters,
        total_weight: Some(UInt32Value { value: total_weight }),
        ..Default::default()
    }));

    Ok(())
}

/// Map an HTTP redirect status to the proxy's redirect response code.
fn redirect_response_code(code: u32) -> redirect_action::RedirectResponseCode {
    match code {
        302 => redirect_action::RedirectResponseCode::Found,
        303 => redirect_action::RedirectResponseCode::SeeOther,
        307 => redirect_action::RedirectResponseCode::TemporaryRedirect,
        308 => redirect_action::RedirectResponseCode::PermanentRedirect,
        _ => redirect_action::RedirectResponseCode::MovedPermanently,
    }
}

fn data_source_from_string(body: &str) -> Option<DataSource> {
    if body.is_empty() {
        return None;
    }
    Some(DataSource {
        specifier: Some(data_source::Specifier::InlineString(body.to_string())),
        ..Default::default()
    })
}
