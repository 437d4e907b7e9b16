//! Canonical fixture output.
//!
//! One JSON file per case, `<case_id>.json`, 2-space indent, keys sorted at
//! every nesting level, non-ASCII text unescaped, exactly one trailing
//! newline. The fixture directory is wiped and recreated once per run, so a
//! completed run contains exactly the current catalog and nothing stale.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::HarnessError;
use crate::fixture::Fixture;

/// Clears the fixture directory, creating it (and parents) fresh.
pub fn reset_fixture_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

/// Renders canonical fixture JSON. serde_json objects keep their keys
/// sorted, so converting through `Value` canonicalizes every level; the
/// pretty printer contributes the 2-space indent and raw UTF-8 strings.
pub fn canonical_json<T: Serialize>(payload: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(payload)?;
    Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
}

pub fn write_fixture(dir: &Path, fixture: &Fixture) -> Result<PathBuf, HarnessError> {
    let path = dir.join(format!("{}.json", fixture.case.case_id));
    fs::write(&path, canonical_json(fixture)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_json_sorts_keys_and_ends_with_one_newline() {
        let rendered = canonical_json(&json!({"zeta": 1, "alpha": {"b": 2, "a": 1}})).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"alpha\": {\n    \"a\": 1,\n    \"b\": 2\n  },\n  \"zeta\": 1\n}\n"
        );
    }

    #[test]
    fn canonical_json_keeps_non_ascii_unescaped() {
        let rendered = canonical_json(&json!({"text": "héllo — 世界"})).unwrap();
        assert!(rendered.contains("héllo — 世界"));
    }

    #[test]
    fn reset_clears_previous_contents() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("fixtures");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.json"), "{}").unwrap();
        reset_fixture_dir(&dir).unwrap();
        assert!(dir.exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }
}
