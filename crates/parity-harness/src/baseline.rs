//! Baseline source-root resolution.
//!
//! Fixtures are only meaningful against a known baseline; the CLI refuses to
//! run when the baseline source tree is absent so a misconfigured checkout
//! cannot silently regenerate fixtures against nothing.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// Environment override for the baseline engine source root.
pub const BASELINE_ROOT_ENV: &str = "PARITY_BASELINE_ROOT";

/// Resolves the baseline engine source root, defaulting to the in-tree
/// engine crate next to this one.
pub fn resolve_root() -> Result<PathBuf, HarnessError> {
    let root = match env::var_os(BASELINE_ROOT_ENV) {
        Some(path) => PathBuf::from(path),
        None => Path::new(env!("CARGO_MANIFEST_DIR")).join("../prompt-engine"),
    };
    if !root.exists() {
        return Err(HarnessError::BaselineMissing(root));
    }
    Ok(root)
}
