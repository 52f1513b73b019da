//! # Routeplane
//!
//! Routeplane is the translation core of an Envoy proxy control plane. It
//! converts high-level, operator-authored routing configuration (virtual
//! hosts, routes, upstreams, listeners) into the low-level resources an
//! Envoy data plane consumes (route configurations, virtual hosts, route
//! matchers and actions), together with a structured validation report.
//!
//! ## Architecture
//!
//! The system follows a layered pipeline:
//!
//! ```text
//! Domain Snapshot → Translator → Envoy RouteConfigurations + ProxyReport
//!        ↓               ↓
//!   Resource Watch   Plugin Chain
//! ```
//!
//! ## Core Components
//!
//! - **Domain model**: pure configuration types assembled by the watch layer
//! - **Translator**: deterministic, side-effect-free lowering into
//!   `envoy-types` protobuf resources
//! - **Plugin chain**: fixed-order hooks that observe and mutate the output
//!   at virtual-host, route, route-action, and weighted-destination scope
//! - **Validation report**: a tree of findings mirroring the input, consumed
//!   by callers deciding whether a config is safe to ship

pub mod config;
pub mod domain;
pub mod errors;
pub mod report;
pub mod translator;
pub mod utils;

// Re-export commonly used types and traits
pub use config::TranslationSettings;
pub use errors::{Error, Result};
pub use translator::{ProxyConfig, TranslationContext, Translator};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
