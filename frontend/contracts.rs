//! Contract registry as consumed by the frontend.
//!
//! The registry is generated by the export script from on-disk deployment
//! records and is read-only here: one entry per contract, keyed by the
//! stripped (no `0x`) address.

use std::{collections::BTreeMap, path::Path};

use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use helpers::artifacts::DeploymentRecord;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid registry JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error(
        "{address} is missing in contracts; have you built, deployed and exported the contract?"
    )]
    MissingContract { address: String },
}

/// What a UI component needs to talk to one deployed contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractData {
    pub name: String,
    pub address: Address,
    pub abi: JsonAbi,
}

impl From<DeploymentRecord> for ContractData {
    fn from(record: DeploymentRecord) -> Self {
        Self {
            name: record.name,
            address: record.address,
            abi: record.abi,
        }
    }
}

/// Loads the generated registry module.
pub fn load_registry(path: &Path) -> Result<BTreeMap<String, ContractData>, RegistryError> {
    let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let records: BTreeMap<String, DeploymentRecord> =
        serde_json::from_str(&content).map_err(|source| RegistryError::Json {
            path: path.display().to_string(),
            source,
        })?;
    Ok(records
        .into_iter()
        .map(|(address, record)| (address, record.into()))
        .collect())
}

/// Looks up the contract the app is bound to, by stripped address.
pub fn select_contract(
    registry: &BTreeMap<String, ContractData>,
    address: &str,
) -> Result<ContractData, RegistryError> {
    registry
        .get(address)
        .cloned()
        .ok_or_else(|| RegistryError::MissingContract {
            address: address.to_string(),
        })
}
