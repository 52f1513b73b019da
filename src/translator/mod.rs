//! Translation core
//!
//! The translator is the pure, deterministic function from a validated input
//! snapshot to the proxy-level route configurations, together with a
//! structured validation report. It performs no I/O, holds no state across
//! calls, and never aborts on a finding: every problem is recorded on the
//! report node closest to its cause.
//!
//! Composition is leaf-first: matcher compiler → destination resolver →
//! action compiler → virtual-host compiler → route-config compiler, with the
//! plugin chain applied at well-defined phases of each stage.

mod action;
mod destination;
mod matcher;
pub mod plugins;
mod route_config;
mod virtual_host;

pub use route_config::{route_config_name, SslConfigError};

use std::sync::Arc;

use envoy_types::pb::envoy::config::route::v3::RouteConfiguration;
use envoy_types::pb::google::protobuf::Any;
use prost::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::TranslationSettings;
use crate::domain::{ResourceRef, Snapshot};
use crate::errors::{Error, Result};
use crate::report::ProxyReport;
use plugins::{default_plugins, Params, TranslatorPlugin};

/// Type URL under which route configurations are shipped to the proxy.
pub const ROUTE_TYPE_URL: &str = "type.googleapis.com/envoy.config.route.v3.RouteConfiguration";

/// Findings produced while compiling destinations, actions, and plugins.
///
/// A warning-classified error is recorded on the report and translation
/// proceeds; everything else is recorded as a processing error. Neither
/// aborts the translation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("upstream {0} not found")]
    UpstreamNotFound(ResourceRef),

    #[error("upstream group {0} not found")]
    UpstreamGroupNotFound(ResourceRef),

    #[error("route has a subset config, but upstream {0} does not")]
    SubsetsMisconfigured(ResourceRef),

    #[error("route has a subset config, but none of the subsets on upstream {0} match it")]
    SubsetsNotMatched(ResourceRef),

    #[error("must specify at least one weighted destination for multi destination routes")]
    NoDestinationSpecified,

    #[error("header option has an empty name")]
    EmptyHeaderName,

    #[error("invalid destination in weighted destination list: {0}")]
    InvalidWeightedDestination(Box<TranslationError>),
}

impl TranslationError {
    /// Whether this finding is reported as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        match self {
            Self::UpstreamNotFound(_)
            | Self::UpstreamGroupNotFound(_)
            | Self::SubsetsMisconfigured(_)
            | Self::SubsetsNotMatched(_) => true,
            Self::InvalidWeightedDestination(inner) => inner.is_warning(),
            Self::NoDestinationSpecified | Self::EmptyHeaderName => false,
        }
    }
}

/// Carries the cancellation signal for one translation call.
///
/// The signal is polled between listeners; once it fires, partial output is
/// discarded and [`Error::Cancelled`] returned.
#[derive(Debug, Clone, Default)]
pub struct TranslationContext {
    pub cancel: CancellationToken,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

/// The emitted proxy configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProxyConfig {
    /// One route configuration per HTTP listener, in listener order
    pub route_configs: Vec<RouteConfiguration>,
}

impl ProxyConfig {
    /// Wrap the route configurations as named xDS resources.
    pub fn into_resources(self) -> Vec<BuiltResource> {
        self.route_configs
            .into_iter()
            .map(|route_config| BuiltResource {
                name: route_config.name.clone(),
                resource: Any {
                    type_url: ROUTE_TYPE_URL.to_string(),
                    value: route_config.encode_to_vec(),
                },
            })
            .collect()
    }
}

/// Wrapper for a built proxy resource along with its name.
#[derive(Clone, Debug)]
pub struct BuiltResource {
    pub name: String,
    pub resource: Any,
}

impl BuiltResource {
    pub fn into_any(self) -> Any {
        self.resource
    }

    pub fn type_url(&self) -> &str {
        &self.resource.type_url
    }
}

/// Translates domain snapshots into proxy configuration.
///
/// Construction fixes the plugin order; translation is then a pure function
/// of the snapshot. Multiple translations may run in parallel on distinct
/// snapshots.
pub struct Translator {
    settings: TranslationSettings,
    plugins: Vec<Arc<dyn TranslatorPlugin>>,
}

impl Translator {
    /// Translator with the built-in plugin chain.
    pub fn new(settings: TranslationSettings) -> Self {
        Self::with_plugins(settings, default_plugins())
    }

    /// Translator with a caller-supplied plugin chain, applied in order.
    pub fn with_plugins(
        settings: TranslationSettings,
        plugins: Vec<Arc<dyn TranslatorPlugin>>,
    ) -> Self {
        Self { settings, plugins }
    }

    /// Translate one snapshot.
    ///
    /// Returns the emitted route configurations and the validation report
    /// mirroring the snapshot. Findings never abort the translation; only
    /// cancellation does.
    pub fn translate(
        &self,
        ctx: &TranslationContext,
        snapshot: &Snapshot,
    ) -> Result<(ProxyConfig, ProxyReport)> {
        let mut report = ProxyReport::for_snapshot(snapshot);
        let mut route_configs = Vec::new();

        for (idx, listener) in snapshot.listeners.iter().enumerate() {
            if ctx.cancel.is_cancelled() {
                debug!(listener = %listener.name, "Translation cancelled; discarding partial output");
                return Err(Error::Cancelled);
            }

            let params = Params { snapshot, settings: &self.settings };
            let Some(listener_report) = report.listeners.get_mut(idx) else {
                error!(
                    listener = %listener.name,
                    index = idx,
                    "internal error: listener report missing; skipping listener"
                );
                continue;
            };

            if let Some(route_config) = route_config::compute_route_config(
                &self.plugins,
                params,
                listener,
                listener_report,
            ) {
                debug!(
                    route_config = %route_config.name,
                    virtual_hosts = route_config.virtual_hosts.len(),
                    "Compiled route configuration"
                );
                route_configs.push(route_config);
            }
        }

        Ok((ProxyConfig { route_configs }, report))
    }
}
