//! Listener domain types

use serde::{Deserialize, Serialize};

use super::reference::ResourceRef;
use super::virtual_host::VirtualHost;

/// A bind point of the proxy.
///
/// Only HTTP listeners produce route configurations; other listener types
/// are skipped by the route-config compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub name: String,
    pub bind_address: String,
    pub bind_port: u32,
    pub listener_type: ListenerType,

    /// TLS configurations terminated on this listener. A non-empty list makes
    /// every virtual host require TLS.
    #[serde(default)]
    pub ssl_configurations: Vec<SslConfig>,
}

/// Closed set of listener kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListenerType {
    Http(HttpListener),
    Tcp,
}

/// The HTTP side of a listener: the virtual hosts served on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HttpListener {
    #[serde(default)]
    pub virtual_hosts: Vec<VirtualHost>,
}

/// One TLS termination config on a listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SslConfig {
    pub secret: SslSecrets,

    #[serde(default)]
    pub sni_domains: Vec<String>,
}

/// Where the TLS material comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SslSecrets {
    /// A secret resolved from the snapshot
    SecretRef(ResourceRef),

    /// Files mounted next to the proxy
    Files(SslFiles),
}

/// Certificate/key file paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SslFiles {
    pub cert_chain: String,
    pub private_key: String,
    #[serde(default)]
    pub root_ca: Option<String>,
}
