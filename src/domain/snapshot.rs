//! The immutable input bundle for one translation

use serde::{Deserialize, Serialize};

use super::listener::Listener;
use super::reference::ResourceRef;
use super::secret::Secret;
use super::upstream::{Upstream, UpstreamGroup};

/// Everything one translation reads.
///
/// Assembled by the external watch layer, passed by immutable reference to
/// one [`crate::Translator::translate`] call, then discarded. Sequences keep
/// the order in which the watch layer delivered them; the translator never
/// reorders them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub upstreams: Vec<Upstream>,

    #[serde(default)]
    pub upstream_groups: Vec<UpstreamGroup>,

    #[serde(default)]
    pub secrets: Vec<Secret>,

    #[serde(default)]
    pub listeners: Vec<Listener>,
}

impl Snapshot {
    /// Find an upstream by reference.
    pub fn upstream(&self, r: &ResourceRef) -> Option<&Upstream> {
        self.upstreams.iter().find(|u| &u.metadata == r)
    }

    /// Find an upstream group by reference.
    pub fn upstream_group(&self, r: &ResourceRef) -> Option<&UpstreamGroup> {
        self.upstream_groups.iter().find(|g| &g.metadata == r)
    }

    /// Find a secret by reference.
    pub fn secret(&self, r: &ResourceRef) -> Option<&Secret> {
        self.secrets.iter().find(|s| &s.metadata == r)
    }
}
