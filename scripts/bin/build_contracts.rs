//! Compiles every `.sol` source in `contracts/` and writes one
//! `{abi, bytecode}` artifact file per emitted contract under
//! `.build/contracts`. Any compiler error aborts the whole run.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::Context;
use helpers::{
    artifacts::{ContractArtifact, BUILD_DIR, CONTRACTS_SRC_DIR},
    solc,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    scripts::init_tracing();

    let out_dir = Path::new(BUILD_DIR);
    if out_dir.exists() {
        fs::remove_dir_all(out_dir)
            .with_context(|| format!("failed to clear {}", out_dir.display()))?;
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    info!("Compiling contracts...");

    let mut entries: Vec<_> = fs::read_dir(CONTRACTS_SRC_DIR)
        .with_context(|| format!("failed to read {CONTRACTS_SRC_DIR}"))?
        .collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("sol") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        info!("Compiling {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let output = solc::compile(BTreeMap::from([(name.to_string(), content)]))?;

        for (contract_name, contract) in output.emitted_contracts() {
            info!("Writing contract {contract_name}...");
            let artifact = ContractArtifact {
                abi: contract.abi.clone(),
                bytecode: format!("0x{}", contract.evm.bytecode.object),
            };
            artifact.write(out_dir, contract_name)?;
        }
    }

    Ok(())
}
