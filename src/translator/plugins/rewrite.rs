//! Rewrite plugin
//!
//! Lowers the host-rewrite and prefix-rewrite route options onto the emitted
//! route action.

use envoy_types::pb::envoy::config::route::v3::{
    route_action::HostRewriteSpecifier, RouteAction as EnvoyRouteAction,
};
use envoy_types::pb::google::protobuf::BoolValue;

use crate::domain::{HostRewrite, RouteAction};
use crate::translator::TranslationError;

use super::{RouteActionParams, RouteActionPlugin, TranslatorPlugin};

/// Applies host and prefix rewrites from the route options.
#[derive(Debug, Default)]
pub struct RewritePlugin;

impl TranslatorPlugin for RewritePlugin {
    fn name(&self) -> &'static str {
        "rewrite"
    }

    fn route_action_plugin(&self) -> Option<&dyn RouteActionPlugin> {
        Some(self)
    }
}

impl RouteActionPlugin for RewritePlugin {
    fn process_route_action(
        &self,
        params: &RouteActionParams<'_>,
        _input: &RouteAction,
        output: &mut EnvoyRouteAction,
    ) -> Result<(), TranslationError> {
        let Some(options) = params.route.options.as_ref() else {
            return Ok(());
        };

        match &options.host_rewrite {
            Some(HostRewrite::Host(host)) => {
                output.host_rewrite_specifier =
                    Some(HostRewriteSpecifier::HostRewriteLiteral(host.clone()));
            }
            Some(HostRewrite::Auto) => {
                output.host_rewrite_specifier =
                    Some(HostRewriteSpecifier::AutoHostRewrite(BoolValue { value: true }));
            }
            None => {}
        }

        if let Some(prefix) = &options.prefix_rewrite {
            output.prefix_rewrite = prefix.clone();
        }

        Ok(())
    }
}
