//! Walks an artifact through the deploy-record and export steps and reads
//! it back the way the frontend does.

use alloy_primitives::Address;
use helpers::{
    artifacts::{ContractArtifact, DeploymentRecord},
    registry,
};
use tests::{storage_abi, write_record};

#[test]
fn record_survives_export_and_frontend_load() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let deployed = dir.path().join("deployed");
    let address = Address::from([0xab; 20]);
    let record = write_record(&deployed, "Storage", address);

    let out = dir.path().join("dist").join("contracts.json");
    registry::export(&[deployed], &out)?.expect("records found");

    let loaded = frontend::contracts::load_registry(&out)?;
    let key = address.to_string();
    let key = key.trim_start_matches("0x");
    let contract = frontend::contracts::select_contract(&loaded, key)?;

    assert_eq!(contract.name, record.name);
    assert_eq!(contract.address, address);
    assert_eq!(contract.abi, record.abi);
    Ok(())
}

#[test]
fn artifact_to_record_loses_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = ContractArtifact {
        abi: storage_abi(),
        bytecode: "0x60806040".to_string(),
    };
    let path = artifact.write(dir.path(), "Storage")?;
    let loaded = ContractArtifact::load(&path)?;
    assert_eq!(loaded, artifact);

    let record = DeploymentRecord::new(
        "Storage".to_string(),
        Address::from([0xcd; 20]),
        loaded.abi,
    );
    let record_path = record.write(dir.path())?;
    assert_eq!(DeploymentRecord::load(&record_path)?, record);
    Ok(())
}
