//! Plugin pipeline
//!
//! Plugins are registered in a fixed order when the translator is built and
//! are applied in that order at each scope. A plugin declares the
//! capabilities it implements by overriding the corresponding accessor on
//! [`TranslatorPlugin`]; a plugin lacking a capability is skipped at that
//! scope.
//!
//! Plugins receive the enclosing scope through the params structs and write
//! through the `&mut` output reference only; they must not retain references
//! to output objects after returning.

mod headers;
mod rewrite;

pub use headers::HeaderManipulationPlugin;
pub use rewrite::RewritePlugin;

use std::sync::Arc;

use envoy_types::pb::envoy::config::route::v3::{
    weighted_cluster::ClusterWeight, Route as EnvoyRoute, RouteAction as EnvoyRouteAction,
    VirtualHost as EnvoyVirtualHost,
};

use crate::config::TranslationSettings;
use crate::domain::{Listener, Route, RouteAction, Snapshot, VirtualHost, WeightedDestination};
use crate::translator::TranslationError;

/// Translation-wide context handed to every plugin.
#[derive(Clone, Copy)]
pub struct Params<'a> {
    pub snapshot: &'a Snapshot,
    pub settings: &'a TranslationSettings,
}

/// [`Params`] plus the enclosing listener.
#[derive(Clone, Copy)]
pub struct VirtualHostParams<'a> {
    pub params: Params<'a>,
    pub listener: &'a Listener,
}

/// [`VirtualHostParams`] plus the enclosing virtual host.
///
/// The virtual host is the translator's sanitized clone, not the snapshot
/// original.
#[derive(Clone, Copy)]
pub struct RouteParams<'a> {
    pub vhost: VirtualHostParams<'a>,
    pub virtual_host: &'a VirtualHost,
}

impl<'a> RouteParams<'a> {
    pub fn snapshot(&self) -> &'a Snapshot {
        self.vhost.params.snapshot
    }

    pub fn settings(&self) -> &'a TranslationSettings {
        self.vhost.params.settings
    }
}

/// [`RouteParams`] plus the enclosing route.
#[derive(Clone, Copy)]
pub struct RouteActionParams<'a> {
    pub route_params: RouteParams<'a>,
    pub route: &'a Route,
}

/// Base trait for translator plugins.
///
/// The default accessors return `None`; a plugin opts into a capability by
/// returning `Some(self)` from the matching accessor.
pub trait TranslatorPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn virtual_host_plugin(&self) -> Option<&dyn VirtualHostPlugin> {
        None
    }

    fn route_plugin(&self) -> Option<&dyn RoutePlugin> {
        None
    }

    fn route_action_plugin(&self) -> Option<&dyn RouteActionPlugin> {
        None
    }

    fn weighted_destination_plugin(&self) -> Option<&dyn WeightedDestinationPlugin> {
        None
    }

    /// Header-manipulation capability. Direct responses support header
    /// mutation and nothing else, so this is the only capability applied to
    /// them.
    fn header_manipulation_plugin(&self) -> Option<&dyn RoutePlugin> {
        None
    }
}

/// Observes and mutates an assembled proxy virtual host.
pub trait VirtualHostPlugin: Send + Sync {
    fn process_virtual_host(
        &self,
        params: &VirtualHostParams<'_>,
        input: &VirtualHost,
        output: &mut EnvoyVirtualHost,
    ) -> Result<(), TranslationError>;
}

/// Observes and mutates a whole emitted proxy route.
pub trait RoutePlugin: Send + Sync {
    fn process_route(
        &self,
        params: &RouteParams<'_>,
        input: &Route,
        output: &mut EnvoyRoute,
    ) -> Result<(), TranslationError>;
}

/// Observes and mutates the route-action portion of an emitted route.
pub trait RouteActionPlugin: Send + Sync {
    fn process_route_action(
        &self,
        params: &RouteActionParams<'_>,
        input: &RouteAction,
        output: &mut EnvoyRouteAction,
    ) -> Result<(), TranslationError>;
}

/// Observes and mutates one emitted weighted cluster entry.
pub trait WeightedDestinationPlugin: Send + Sync {
    fn process_weighted_destination(
        &self,
        params: &RouteParams<'_>,
        input: &WeightedDestination,
        output: &mut ClusterWeight,
    ) -> Result<(), TranslationError>;
}

/// The built-in plugin chain, in registration order.
pub fn default_plugins() -> Vec<Arc<dyn TranslatorPlugin>> {
    vec![Arc::new(HeaderManipulationPlugin), Arc::new(RewritePlugin)]
}
