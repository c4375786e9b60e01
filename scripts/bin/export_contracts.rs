//! Merges pinned and deployed records into `dist/contracts.json` for the
//! frontend. Finding no records is a warning, not an error.

use std::path::{Path, PathBuf};

use helpers::{
    artifacts::{DEPLOYED_DIR, PINNED_DIR, REGISTRY_PATH},
    registry,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    scripts::init_tracing();

    // Deployed records are scanned last so they override pinned ones.
    let dirs = [PathBuf::from(PINNED_DIR), PathBuf::from(DEPLOYED_DIR)];
    if let Some(path) = registry::export(&dirs, Path::new(REGISTRY_PATH))? {
        info!("Exported contracts to {}", path.display());
    }

    Ok(())
}
