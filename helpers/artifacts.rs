//! On-disk formats shared by the build, deploy and export scripts.
//!
//! A compile produces one artifact file per contract under
//! `.build/contracts`; a deployment produces one record file per contract
//! address under `.deploys/deployed-contracts`. Both are plain JSON and are
//! never mutated after they are written.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use alloy_json_abi::JsonAbi;
use alloy_primitives::{hex, Address, Bytes};
use serde::{Deserialize, Serialize};

/// Directory scanned for `*.sol` sources.
pub const CONTRACTS_SRC_DIR: &str = "contracts";
/// Directory the compiler driver writes artifacts to.
pub const BUILD_DIR: &str = ".build/contracts";
/// Records pinned by hand (e.g. contracts deployed from Remix).
pub const PINNED_DIR: &str = ".deploys/pinned-contracts";
/// Records written by the deploy script.
pub const DEPLOYED_DIR: &str = ".deploys/deployed-contracts";
/// Registry module generated by the exporter.
pub const REGISTRY_PATH: &str = "dist/contracts.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
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
    #[error("invalid bytecode hex: {0}")]
    BadBytecode(#[from] hex::FromHexError),
}

/// Compiled contract output: ABI plus `0x`-prefixed creation bytecode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractArtifact {
    pub abi: JsonAbi,
    pub bytecode: String,
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the artifact as `<dir>/<name>.json` and returns the path.
    pub fn write(&self, dir: &Path, name: &str) -> Result<PathBuf, ArtifactError> {
        let path = dir.join(format!("{name}.json"));
        let content = serde_json::to_string_pretty(self).map_err(|source| ArtifactError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, content).map_err(|source| ArtifactError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Decodes the `0x`-prefixed bytecode into raw bytes.
    pub fn bytecode_bytes(&self) -> Result<Bytes, ArtifactError> {
        let raw = self.bytecode.strip_prefix("0x").unwrap_or(&self.bytecode);
        Ok(Bytes::from(hex::decode(raw)?))
    }
}

/// One successful deployment. The address is the natural key: the record
/// file is named after it and the exporter keys the registry by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub name: String,
    pub address: Address,
    pub abi: JsonAbi,
    /// Unix timestamp in milliseconds.
    pub deployed_at: i64,
}

impl DeploymentRecord {
    pub fn new(name: String, address: Address, abi: JsonAbi) -> Self {
        Self {
            name,
            address,
            abi,
            deployed_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the record as `<dir>/<0xAddress>.json` and returns the path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, ArtifactError> {
        let path = dir.join(format!("{}.json", self.address));
        let content = serde_json::to_string(self).map_err(|source| ArtifactError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, content).map_err(|source| ArtifactError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_abi() -> JsonAbi {
        serde_json::from_str(
            r#"[
                {"type":"function","name":"retrieve","inputs":[],"outputs":[{"name":"","type":"uint256","internalType":"uint256"}],"stateMutability":"view"},
                {"type":"function","name":"store","inputs":[{"name":"num","type":"uint256","internalType":"uint256"}],"outputs":[],"stateMutability":"nonpayable"},
                {"type":"function","name":"addMoney","inputs":[{"name":"num","type":"uint256","internalType":"uint256"}],"outputs":[],"stateMutability":"payable"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn artifact_round_trips_through_json() {
        let artifact = ContractArtifact {
            abi: storage_abi(),
            bytecode: "0x6080604052".to_string(),
        };
        let json = serde_json::to_string(&artifact).unwrap();
        let back: ContractArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, artifact);
    }

    #[test]
    fn bytecode_bytes_strips_the_prefix() {
        let artifact = ContractArtifact {
            abi: storage_abi(),
            bytecode: "0x6080".to_string(),
        };
        assert_eq!(artifact.bytecode_bytes().unwrap().as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn bad_bytecode_is_rejected() {
        let artifact = ContractArtifact {
            abi: storage_abi(),
            bytecode: "0xzz".to_string(),
        };
        assert!(artifact.bytecode_bytes().is_err());
    }

    #[test]
    fn record_serializes_timestamp_as_deployed_at() {
        let record = DeploymentRecord::new(
            "Storage".to_string(),
            Address::from([0x42; 20]),
            storage_abi(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"deployedAt\""));
        let back: DeploymentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_file_is_named_by_address() {
        let dir = tempfile::tempdir().unwrap();
        let record = DeploymentRecord::new(
            "Storage".to_string(),
            Address::from([0x42; 20]),
            storage_abi(),
        );
        let path = record.write(dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("0x"));
        assert!(name.ends_with(".json"));
        assert_eq!(DeploymentRecord::load(&path).unwrap(), record);
    }
}
