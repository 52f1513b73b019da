//! Translator configuration
//!
//! Settings that shape a translation run. Loaded by the embedding control
//! plane and passed to [`crate::Translator::new`].

mod settings;

pub use settings::{InvalidConfigPolicy, TranslationSettings};
