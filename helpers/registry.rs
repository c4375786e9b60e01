//! The artifact exporter: merges pinned and deployed records into the
//! single registry module the frontend imports.
//!
//! Records are keyed by their stripped (no `0x`) address. Directories are
//! scanned in order, so a record in a later directory silently replaces an
//! earlier one with the same address: locally deployed contracts take
//! precedence over pinned ones.

use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Extracts the registry key from a record file name.
///
/// Only `0x<address>.json` names qualify; everything else is skipped.
fn record_key(name: &str) -> Option<&str> {
    let key = name.strip_prefix("0x")?.strip_suffix(".json")?;
    (!key.is_empty()).then_some(key)
}

/// Collects address-keyed records from the given directories, in order.
///
/// A directory that does not exist is fine and contributes nothing; any
/// other IO error aborts. Nested directories are walked recursively.
pub fn collect_records(
    dirs: &[PathBuf],
) -> Result<BTreeMap<String, serde_json::Value>, RegistryError> {
    let mut records = BTreeMap::new();
    for dir in dirs {
        if !dir.exists() {
            continue;
        }
        visit(dir, &mut records)?;
    }
    Ok(records)
}

fn visit(
    dir: &Path,
    records: &mut BTreeMap<String, serde_json::Value>,
) -> Result<(), RegistryError> {
    let entries = fs::read_dir(dir).map_err(|source| RegistryError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| RegistryError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            visit(&path, records)?;
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let Some(key) = record_key(&name) else {
            continue;
        };
        info!("Processing contract {key}");
        let content = fs::read_to_string(&path).map_err(|source| RegistryError::Read {
            path: path.clone(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| RegistryError::Json {
                path: path.clone(),
                source,
            })?;
        records.insert(key.to_string(), value);
    }
    Ok(())
}

/// Builds the registry from the given record directories and writes it to
/// `out_path`.
///
/// Returns `Ok(None)` without writing anything when no records were found;
/// that is a warning, not an error. Output is sorted by address, so
/// repeated runs over the same inputs produce identical files.
pub fn export(dirs: &[PathBuf], out_path: &Path) -> Result<Option<PathBuf>, RegistryError> {
    let records = collect_records(dirs)?;
    if records.is_empty() {
        warn!(
            "No contracts found; remember to pin deployed contracts or deploy them locally, \
             in order to use them from frontend"
        );
        return Ok(None);
    }

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).map_err(|source| RegistryError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content =
        serde_json::to_string_pretty(&records).map_err(|source| RegistryError::Json {
            path: out_path.to_path_buf(),
            source,
        })?;
    fs::write(out_path, content).map_err(|source| RegistryError::Write {
        path: out_path.to_path_buf(),
        source,
    })?;
    Ok(Some(out_path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_accepts_only_address_named_json() {
        assert_eq!(record_key("0xabc123.json"), Some("abc123"));
        assert_eq!(record_key("abc123.json"), None);
        assert_eq!(record_key("0xabc123.txt"), None);
        assert_eq!(record_key("0x.json"), None);
    }

    #[test]
    fn absent_directories_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let records = collect_records(&[missing]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn later_directories_win_on_address_collision() {
        let dir = tempfile::tempdir().unwrap();
        let pinned = dir.path().join("pinned");
        let deployed = dir.path().join("deployed");
        fs::create_dir_all(&pinned).unwrap();
        fs::create_dir_all(&deployed).unwrap();
        fs::write(pinned.join("0xaa.json"), r#"{"name":"Pinned"}"#).unwrap();
        fs::write(deployed.join("0xaa.json"), r#"{"name":"Deployed"}"#).unwrap();

        let records = collect_records(&[pinned, deployed]).unwrap();
        assert_eq!(records["aa"]["name"], "Deployed");
    }

    #[test]
    fn nested_directories_are_walked() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("records").join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("0xbb.json"), r#"{"name":"Nested"}"#).unwrap();

        let records = collect_records(&[dir.path().join("records")]).unwrap();
        assert_eq!(records["bb"]["name"], "Nested");
    }
}
