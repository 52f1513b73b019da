//! Virtual-host compiler
//!
//! Produces the proxy-level counterpart of each user virtual host: compiled
//! routes, the defaulted domain list, and the TLS requirement derived from
//! the enclosing listener. Also runs the domain-uniqueness check across all
//! virtual hosts of one HTTP listener.

use std::collections::BTreeMap;
use std::sync::Arc;

use envoy_types::pb::envoy::config::route::v3::{
    virtual_host::TlsRequirementType, VirtualHost as EnvoyVirtualHost,
};
use tracing::error;

use crate::domain::{HttpListener, Listener, VirtualHost};
use crate::report::{FindingKind, HttpListenerReport, RouteReport, VirtualHostReport};
use crate::translator::plugins::{Params, RouteParams, TranslatorPlugin, VirtualHostParams};
use crate::translator::action;
use crate::utils::sanitize_for_proxy;

pub(crate) fn compute_virtual_hosts(
    plugins: &[Arc<dyn TranslatorPlugin>],
    params: Params<'_>,
    listener: &Listener,
    http_listener: &HttpListener,
    http_report: &mut HttpListenerReport,
) -> Vec<EnvoyVirtualHost> {
    validate_virtual_host_domains(&http_listener.virtual_hosts, http_report);

    let require_tls = !listener.ssl_configurations.is_empty();
    let mut out = Vec::with_capacity(http_listener.virtual_hosts.len());

    for (idx, virtual_host) in http_listener.virtual_hosts.iter().enumerate() {
        let vhost_params = VirtualHostParams { params, listener };
        let mut scratch = VirtualHostReport {
            name: virtual_host.name.clone(),
            findings: Vec::new(),
            routes: vec![RouteReport::default(); virtual_host.routes.len()],
        };
        let vhost_report = match http_report.virtual_hosts.get_mut(idx) {
            Some(report) => report,
            None => {
                error!(
                    virtual_host = %virtual_host.name,
                    index = idx,
                    "internal error: virtual host report missing; findings will be discarded"
                );
                &mut scratch
            }
        };
        out.push(compute_virtual_host(plugins, vhost_params, virtual_host, require_tls, vhost_report));
    }

    out
}

fn compute_virtual_host(
    plugins: &[Arc<dyn TranslatorPlugin>],
    params: VirtualHostParams<'_>,
    virtual_host: &VirtualHost,
    require_tls: bool,
    vhost_report: &mut VirtualHostReport,
) -> EnvoyVirtualHost {
    // clone before mutating; the snapshot must survive the translation intact
    let mut virtual_host = virtual_host.clone();
    virtual_host.name = sanitize_for_proxy(&virtual_host.name, "virtual host");

    let mut envoy_routes = Vec::new();
    for (idx, route) in virtual_host.routes.iter().enumerate() {
        let mut scratch = RouteReport::default();
        let route_report = match vhost_report.routes.get_mut(idx) {
            Some(report) => report,
            None => {
                error!(
                    virtual_host = %virtual_host.name,
                    index = idx,
                    "internal error: route report missing; findings will be discarded"
                );
                &mut scratch
            }
        };
        let route_params = RouteParams { vhost: params, virtual_host: &virtual_host };
        envoy_routes.extend(action::envoy_routes(plugins, route_params, route_report, route));
    }

    let domains = if virtual_host.domains.is_empty()
        || (virtual_host.domains.len() == 1 && virtual_host.domains[0].is_empty())
    {
        vec!["*".to_string()]
    } else {
        virtual_host.domains.clone()
    };

    let require_tls_type =
        if require_tls { TlsRequirementType::All } else { TlsRequirementType::None };

    let mut out = EnvoyVirtualHost {
        name: virtual_host.name.clone(),
        domains,
        routes: envoy_routes,
        require_tls: require_tls_type as i32,
        ..Default::default()
    };

    for plugin in plugins {
        let Some(vhost_plugin) = plugin.virtual_host_plugin() else {
            continue;
        };
        if let Err(err) = vhost_plugin.process_virtual_host(&params, &virtual_host, &mut out) {
            vhost_report.append_error(
                FindingKind::ProcessingError,
                format!("invalid virtual host [{}]: {}", virtual_host.name, err),
            );
        }
    }

    out
}

/// Report every domain shared by more than one virtual host of the listener.
///
/// A virtual host with no domains serves `*`, so it collides with every other
/// defaulted host. Empty-string domains are reported separately but still
/// participate in collision detection as themselves.
pub(crate) fn validate_virtual_host_domains(
    virtual_hosts: &[VirtualHost],
    http_report: &mut HttpListenerReport,
) {
    // domain → contributing vhost indices; BTreeMap keeps finding order stable
    let mut domains_to_vhosts: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for (idx, virtual_host) in virtual_hosts.iter().enumerate() {
        if virtual_host.domains.is_empty() {
            domains_to_vhosts.entry("*".to_string()).or_default().push(idx);
        }
        for domain in &virtual_host.domains {
            if domain.is_empty() {
                if let Some(report) = http_report.virtual_hosts.get_mut(idx) {
                    report.append_error(
                        FindingKind::EmptyDomainError,
                        format!("virtual host {} has an empty domain", virtual_host.name),
                    );
                }
            }
            domains_to_vhosts.entry(domain.clone()).or_default().push(idx);
        }
    }

    for (domain, vhosts) in &domains_to_vhosts {
        if vhosts.len() < 2 {
            continue;
        }
        let names: Vec<&str> = vhosts.iter().map(|&i| virtual_hosts[i].name.as_str()).collect();
        for &idx in vhosts {
            if let Some(report) = http_report.virtual_hosts.get_mut(idx) {
                report.append_error(
                    FindingKind::DomainsNotUniqueError,
                    format!(
                        "domain {} is shared by the following virtual hosts: [{}]",
                        domain,
                        names.join(", ")
                    ),
                );
            }
        }
    }
}
