//! Header manipulation plugin
//!
//! Lowers the `headers` option block at virtual-host, route, and
//! weighted-destination scope onto the matching proxy fields.

use envoy_types::pb::envoy::config::core::v3::{
    header_value_option::HeaderAppendAction, HeaderValue as EnvoyHeaderValue, HeaderValueOption,
};
use envoy_types::pb::envoy::config::route::v3::{
    weighted_cluster::ClusterWeight, Route as EnvoyRoute, VirtualHost as EnvoyVirtualHost,
};

use crate::domain::{HeaderValue, Route, VirtualHost, WeightedDestination};
use crate::translator::TranslationError;

use super::{
    RouteParams, RoutePlugin, TranslatorPlugin, VirtualHostParams, VirtualHostPlugin,
    WeightedDestinationPlugin,
};

/// Applies request/response header mutations from the options blocks.
#[derive(Debug, Default)]
pub struct HeaderManipulationPlugin;

impl TranslatorPlugin for HeaderManipulationPlugin {
    fn name(&self) -> &'static str {
        "headers"
    }

    fn virtual_host_plugin(&self) -> Option<&dyn VirtualHostPlugin> {
        Some(self)
    }

    fn route_plugin(&self) -> Option<&dyn RoutePlugin> {
        Some(self)
    }

    fn weighted_destination_plugin(&self) -> Option<&dyn WeightedDestinationPlugin> {
        Some(self)
    }

    fn header_manipulation_plugin(&self) -> Option<&dyn RoutePlugin> {
        Some(self)
    }
}

impl VirtualHostPlugin for HeaderManipulationPlugin {
    fn process_virtual_host(
        &self,
        _params: &VirtualHostParams<'_>,
        input: &VirtualHost,
        output: &mut EnvoyVirtualHost,
    ) -> Result<(), TranslationError> {
        let Some(headers) = input.options.as_ref().and_then(|o| o.headers.as_ref()) else {
            return Ok(());
        };

        output.request_headers_to_add = header_value_options(&headers.request_headers_to_add)?;
        output.request_headers_to_remove = headers.request_headers_to_remove.clone();
        output.response_headers_to_add = header_value_options(&headers.response_headers_to_add)?;
        output.response_headers_to_remove = headers.response_headers_to_remove.clone();
        Ok(())
    }
}

impl RoutePlugin for HeaderManipulationPlugin {
    fn process_route(
        &self,
        _params: &RouteParams<'_>,
        input: &Route,
        output: &mut EnvoyRoute,
    ) -> Result<(), TranslationError> {
        let Some(headers) = input.options.as_ref().and_then(|o| o.headers.as_ref()) else {
            return Ok(());
        };

        output.request_headers_to_add = header_value_options(&headers.request_headers_to_add)?;
        output.request_headers_to_remove = headers.request_headers_to_remove.clone();
        output.response_headers_to_add = header_value_options(&headers.response_headers_to_add)?;
        output.response_headers_to_remove = headers.response_headers_to_remove.clone();
        Ok(())
    }
}

impl WeightedDestinationPlugin for HeaderManipulationPlugin {
    fn process_weighted_destination(
        &self,
        _params: &RouteParams<'_>,
        input: &WeightedDestination,
        output: &mut ClusterWeight,
    ) -> Result<(), TranslationError> {
        let Some(headers) = input.options.as_ref().and_then(|o| o.headers.as_ref()) else {
            return Ok(());
        };

        output.request_headers_to_add = header_value_options(&headers.request_headers_to_add)?;
        output.request_headers_to_remove = headers.request_headers_to_remove.clone();
        output.response_headers_to_add = header_value_options(&headers.response_headers_to_add)?;
        output.response_headers_to_remove = headers.response_headers_to_remove.clone();
        Ok(())
    }
}

fn header_value_options(
    headers: &[HeaderValue],
) -> Result<Vec<HeaderValueOption>, TranslationError> {
    headers
        .iter()
        .map(|h| {
            if h.key.is_empty() {
                return Err(TranslationError::EmptyHeaderName);
            }
            let append_action = if h.append {
                HeaderAppendAction::AppendIfExistsOrAdd
            } else {
                HeaderAppendAction::OverwriteIfExistsOrAdd
            };
            Ok(HeaderValueOption {
                header: Some(EnvoyHeaderValue {
                    key: h.key.clone(),
                    value: h.value.clone(),
                    ..Default::default()
                }),
                append_action: append_action as i32,
                ..Default::default()
            })
        })
        .collect()
}
