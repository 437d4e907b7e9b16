//! Baseline prompt-assembly engine.
//!
//! This crate is the reference collaborator snapshotted by the parity
//! harness: a two-scope prompt store (persistent agent defaults plus
//! per-request fields), a dotted-path settings store, ordered YAML/JSON
//! configure loaders with `${name}` substitution, and the four observable
//! projections (text, messages, output schema, serializable snapshot).
//!
//! Everything here is deterministic and offline; no model call ever happens.

#![forbid(unsafe_code)]

pub mod configure;
pub mod error;
pub mod output;
pub mod prompt;
pub mod render;
pub mod settings;
pub mod value;

pub use error::EngineError;
pub use prompt::{Engine, PromptFormat, Scope};
pub use render::MessageOptions;
pub use value::Mappings;
