//! Golden-fixture generation for prompt-engine parity suites.
//!
//! The harness drives a baseline engine through a fixed case catalog and
//! snapshots every observable projection into one JSON fixture per case.
//! Everything is offline and deterministic: no network, no wall clock, no
//! concurrency; two runs over the same baseline produce byte-identical
//! fixture trees. Expected engine failures (an empty prompt, say) are
//! captured as data inside the fixture; harness-level failures abort the
//! whole run with nothing partially written beyond the already-reset
//! fixture directory.

#![forbid(unsafe_code)]

pub mod baseline;
pub mod catalog;
pub mod collect;
pub mod error;
pub mod fixture;
pub mod generate;
pub mod runner;
pub mod writer;

pub use error::HarnessError;
pub use fixture::{Case, ConfigureBlock, Fixture};
pub use generate::{GenerationSummary, generate_fixtures};
