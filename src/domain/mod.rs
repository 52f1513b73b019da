//! Domain layer
//!
//! Pure configuration types describing what operators author: upstreams,
//! virtual hosts, routes, listeners, secrets. These types have no
//! infrastructure dependencies; the external watch layer assembles them into
//! a [`Snapshot`] and hands that snapshot to the translator by immutable
//! reference.
//!
//! ## Module Organization
//!
//! - `reference`: namespace/name resource references
//! - `upstream`: backend groups, subset specs, upstream groups
//! - `destination`: route targets (single, weighted, group)
//! - `matcher`: request predicates (path, headers, query, methods)
//! - `route`: routes, actions, and per-route options
//! - `virtual_host`: domain-scoped route collections
//! - `listener`: bind points and TLS configuration
//! - `secret`: TLS material referenced by listeners
//! - `snapshot`: the immutable input bundle for one translation

mod destination;
mod listener;
mod matcher;
mod reference;
mod route;
mod secret;
mod snapshot;
mod upstream;
mod virtual_host;

pub use destination::{Destination, DestinationType, MultiDestination, Subset, WeightedDestination};
pub use listener::{HttpListener, Listener, ListenerType, SslConfig, SslFiles, SslSecrets};
pub use matcher::{HeaderMatcher, Matcher, PathSpecifier, QueryParameterMatcher};
pub use route::{
    Action, DirectResponseAction, HeaderManipulation, HeaderValue, HostRewrite, PathRewrite,
    RedirectAction, Route, RouteAction, RouteOptions, WeightedDestinationOptions,
};
pub use reference::ResourceRef;
pub use secret::{Secret, SecretKind, TlsSecret};
pub use snapshot::Snapshot;
pub use upstream::{Selector, StaticHost, SubsetSpec, Upstream, UpstreamGroup, UpstreamType};
pub use virtual_host::{VirtualHost, VirtualHostOptions};
