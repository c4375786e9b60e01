//! Deploys every artifact in `.build/contracts`, one contract at a time,
//! and writes an address-named deployment record for each. Requires
//! `ACCOUNT_SEED` and `RPC_URL`; the first failed deployment aborts the
//! run with no retry.

use std::{fs, path::Path};

use anyhow::Context;
use helpers::{
    artifacts::{ContractArtifact, DeploymentRecord, BUILD_DIR, DEPLOYED_DIR},
    chain::{self, DeployerEnv},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scripts::init_tracing();

    let env = DeployerEnv::from_env()?;
    let signer = chain::wallet_from_phrase(&env.seed_phrase)?;
    let provider = chain::connect_with_wallet(&env.rpc_url, signer)?;

    let deploys_dir = Path::new(DEPLOYED_DIR);
    fs::create_dir_all(deploys_dir)
        .with_context(|| format!("failed to create {}", deploys_dir.display()))?;

    let mut entries: Vec<_> = fs::read_dir(BUILD_DIR)
        .with_context(|| format!("failed to read {BUILD_DIR}; have you run build_contracts?"))?
        .collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let artifact = ContractArtifact::load(&path)?;
        info!("Deploying contract {name}...");

        let (address, _receipt) =
            chain::deploy_contract(&provider, artifact.bytecode_bytes()?).await?;
        info!("Deployed contract {name}: {address}");

        let record = DeploymentRecord::new(name.to_string(), address, artifact.abi);
        record.write(deploys_dir)?;
    }

    Ok(())
}
