//! Validation report
//!
//! A tree of findings mirroring the input snapshot by positional index:
//! proxy → listener → http-listener → virtual host → route. The full shape
//! is allocated up front, before any plugin runs, so that every compiler
//! stage and plugin can append findings to an existing node.
//!
//! Findings never abort a translation. A downstream validator decides
//! whether a config whose report contains errors is safe to ship.

use serde::Serialize;

use crate::domain::{HttpListener, ListenerType, Snapshot};

/// How severe a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// Closed set of finding kinds.
///
/// The severity of each kind is fixed: [`FindingKind::InvalidDestination`]
/// is the only warning, everything else is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingKind {
    /// Listener TLS references an unknown secret or is malformed
    SslConfigError,
    /// A virtual host lists an empty-string domain
    EmptyDomainError,
    /// Two or more virtual hosts share a domain on one HTTP listener
    DomainsNotUniqueError,
    /// A plugin returned a non-warning error
    ProcessingError,
    /// A route matcher lacks a path specifier
    InvalidMatcherError,
    /// Upstream or upstream group missing, or subset misconfigured
    InvalidDestinationWarning,
    /// A multi destination with zero entries
    NoDestinationSpecifiedError,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub message: String,
}

impl Finding {
    fn error(kind: FindingKind, message: String) -> Self {
        Self { severity: Severity::Error, kind, message }
    }

    fn warning(kind: FindingKind, message: String) -> Self {
        Self { severity: Severity::Warning, kind, message }
    }
}

/// Report for one whole translation, one node per input listener.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProxyReport {
    pub listeners: Vec<ListenerReport>,
}

impl ProxyReport {
    /// Allocate the full report shape mirroring `snapshot`.
    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        let listeners = snapshot
            .listeners
            .iter()
            .map(|listener| {
                let http = match &listener.listener_type {
                    ListenerType::Http(http_listener) => {
                        Some(HttpListenerReport::for_listener(http_listener))
                    }
                    ListenerType::Tcp => None,
                };
                ListenerReport { name: listener.name.clone(), findings: Vec::new(), http }
            })
            .collect();
        Self { listeners }
    }

    /// True if any node in the tree carries an error-severity finding.
    pub fn has_errors(&self) -> bool {
        self.findings().any(|f| f.severity == Severity::Error)
    }

    /// True if any node in the tree carries a warning-severity finding.
    pub fn has_warnings(&self) -> bool {
        self.findings().any(|f| f.severity == Severity::Warning)
    }

    /// All findings in the tree, listener order then depth-first.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.listeners.iter().flat_map(|l| {
            l.findings.iter().chain(l.http.iter().flat_map(|h| {
                h.virtual_hosts.iter().flat_map(|vh| {
                    vh.findings.iter().chain(vh.routes.iter().flat_map(|r| r.findings.iter()))
                })
            }))
        })
    }
}

/// Findings scoped to one listener.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListenerReport {
    pub name: String,
    pub findings: Vec<Finding>,
    /// Present iff the listener is an HTTP listener
    pub http: Option<HttpListenerReport>,
}

impl ListenerReport {
    pub fn append_error(&mut self, kind: FindingKind, message: String) {
        self.findings.push(Finding::error(kind, message));
    }
}

/// Per-virtual-host reports of one HTTP listener, in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HttpListenerReport {
    pub virtual_hosts: Vec<VirtualHostReport>,
}

impl HttpListenerReport {
    /// Allocate the report shape for one HTTP listener.
    pub fn for_listener(http_listener: &HttpListener) -> Self {
        Self {
            virtual_hosts: http_listener
                .virtual_hosts
                .iter()
                .map(|vh| VirtualHostReport {
                    name: vh.name.clone(),
                    findings: Vec::new(),
                    routes: vec![RouteReport::default(); vh.routes.len()],
                })
                .collect(),
        }
    }
}

/// Findings scoped to one virtual host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualHostReport {
    pub name: String,
    pub findings: Vec<Finding>,
    pub routes: Vec<RouteReport>,
}

impl VirtualHostReport {
    pub fn append_error(&mut self, kind: FindingKind, message: String) {
        self.findings.push(Finding::error(kind, message));
    }
}

/// Findings scoped to one route.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RouteReport {
    pub findings: Vec<Finding>,
}

impl RouteReport {
    pub fn append_error(&mut self, kind: FindingKind, message: String) {
        self.findings.push(Finding::error(kind, message));
    }

    pub fn append_warning(&mut self, kind: FindingKind, message: String) {
        self.findings.push(Finding::warning(kind, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HttpListener, Listener, Matcher, Route, VirtualHost};
    use crate::domain::{Action, DirectResponseAction};

    fn snapshot_with_one_route() -> Snapshot {
        Snapshot {
            listeners: vec![Listener {
                name: "http".into(),
                bind_address: "0.0.0.0".into(),
                bind_port: 8080,
                listener_type: ListenerType::Http(HttpListener {
                    virtual_hosts: vec![VirtualHost {
                        name: "vh".into(),
                        domains: vec!["*".into()],
                        routes: vec![Route {
                            name: None,
                            matchers: vec![Matcher::prefix("/")],
                            action: Action::DirectResponse(DirectResponseAction {
                                status: 200,
                                body: "ok".into(),
                            }),
                            options: None,
                        }],
                        options: None,
                    }],
                }),
                ssl_configurations: Vec::new(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_report_mirrors_snapshot_shape() {
        let report = ProxyReport::for_snapshot(&snapshot_with_one_route());
        assert_eq!(report.listeners.len(), 1);
        let http = report.listeners[0].http.as_ref().expect("http report");
        assert_eq!(http.virtual_hosts.len(), 1);
        assert_eq!(http.virtual_hosts[0].routes.len(), 1);
    }

    #[test]
    fn test_error_and_warning_queries() {
        let mut report = ProxyReport::for_snapshot(&snapshot_with_one_route());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());

        let route = &mut report.listeners[0].http.as_mut().unwrap().virtual_hosts[0].routes[0];
        route.append_warning(
            FindingKind::InvalidDestinationWarning,
            "upstream default.missing not found".into(),
        );
        assert!(report.has_warnings());
        assert!(!report.has_errors());

        let vh = &mut report.listeners[0].http.as_mut().unwrap().virtual_hosts[0];
        vh.append_error(FindingKind::EmptyDomainError, "virtual host vh has an empty domain".into());
        assert!(report.has_errors());
    }
}
