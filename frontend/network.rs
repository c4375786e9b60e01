//! Read-only contract state shown at the top of the app.

use alloy_primitives::utils::format_ether;

use crate::{
    contracts::ContractData,
    provider::{ProviderError, WalletProvider},
};

/// Stored value, contract balance and chain id, already formatted for
/// display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkData {
    pub stored_value: String,
    pub balance: String,
    pub chain_id: String,
}

/// Fetches all three reads concurrently.
pub async fn fetch_network_data(
    provider: &dyn WalletProvider,
    contract: &ContractData,
) -> Result<NetworkData, ProviderError> {
    let (stored_value, balance, chain_id) = tokio::try_join!(
        provider.retrieve(contract),
        provider.balance_of(contract.address),
        provider.chain_id(),
    )?;
    Ok(NetworkData {
        stored_value: stored_value.to_string(),
        balance: format!("{} ETH", format_ether(balance)),
        chain_id: chain_id.to_string(),
    })
}

/// Network data bound to one contract identity. Data is fetched once on
/// construction and again only when the contract's address/ABI identity
/// changes.
#[derive(Debug, Clone)]
pub struct NetworkView {
    contract: ContractData,
    pub data: NetworkData,
}

impl NetworkView {
    pub async fn load(
        provider: &dyn WalletProvider,
        contract: &ContractData,
    ) -> Result<Self, ProviderError> {
        let data = fetch_network_data(provider, contract).await?;
        Ok(Self {
            contract: contract.clone(),
            data,
        })
    }

    /// Refetches only if the contract identity changed. Returns whether a
    /// fetch happened.
    pub async fn sync(
        &mut self,
        provider: &dyn WalletProvider,
        contract: &ContractData,
    ) -> Result<bool, ProviderError> {
        if self.contract == *contract {
            return Ok(false);
        }
        self.data = fetch_network_data(provider, contract).await?;
        self.contract = contract.clone();
        Ok(true)
    }

    /// Unconditional refetch, for after a confirmed transaction.
    pub async fn refresh(
        &mut self,
        provider: &dyn WalletProvider,
    ) -> Result<(), ProviderError> {
        self.data = fetch_network_data(provider, &self.contract).await?;
        Ok(())
    }
}
