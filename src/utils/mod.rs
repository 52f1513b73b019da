//! Utility functions and helpers

use tracing::debug;

use crate::domain::ResourceRef;

/// Sanitize a resource name to the character set the proxy accepts.
///
/// Deterministic and idempotent: characters outside `[A-Za-z0-9_.-]` are
/// replaced with `_`, and replacement characters are themselves legal, so
/// sanitizing twice yields the same string.
pub fn sanitize_for_proxy(name: &str, kind: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') { c } else { '_' })
        .collect();

    if sanitized != name {
        debug!(kind, original = %name, sanitized = %sanitized, "Sanitized resource name");
    }

    sanitized
}

/// Derive the cluster name for an upstream reference.
///
/// Injective over the upstreams of a snapshot as long as names do not contain
/// the separator, which namespaced resource names do not.
pub fn cluster_name(upstream: &ResourceRef) -> String {
    format!("{}_{}", upstream.name, upstream.namespace)
}
