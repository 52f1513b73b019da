//! Secret domain types

use serde::{Deserialize, Serialize};

use super::reference::ResourceRef;

/// An opaque blob referenced by listener TLS configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub metadata: ResourceRef,
    pub kind: SecretKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SecretKind {
    Tls(TlsSecret),
    Opaque(Vec<u8>),
}

/// PEM-encoded TLS material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlsSecret {
    pub cert_chain: String,
    pub private_key: String,
    #[serde(default)]
    pub root_ca: Option<String>,
}
