//! Wallet and provider setup shared by the deploy script and the app.
//!
//! Transaction construction, signing and ABI encoding are all owned by the
//! alloy stack; this module only wires a seed-phrase wallet onto an HTTP
//! provider and exposes the one deployment primitive the scripts need.

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};

/// Seed phrase for the deploying wallet.
pub const ACCOUNT_SEED_ENV: &str = "ACCOUNT_SEED";
/// HTTP RPC endpoint of the target chain.
pub const RPC_URL_ENV: &str = "RPC_URL";

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("{0} environment variable is required for deploying smart contract")]
    MissingEnv(&'static str),
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),
    #[error("invalid account seed phrase: {0}")]
    InvalidSeed(String),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("no contract address in deployment receipt")]
    MissingContractAddress,
}

/// Configuration the deploy script requires up front.
#[derive(Debug, Clone)]
pub struct DeployerEnv {
    pub seed_phrase: String,
    pub rpc_url: String,
}

impl DeployerEnv {
    /// Reads `ACCOUNT_SEED` and `RPC_URL`, failing fast on whichever is
    /// missing first.
    pub fn from_env() -> Result<Self, ChainError> {
        let seed_phrase = std::env::var(ACCOUNT_SEED_ENV)
            .map_err(|_| ChainError::MissingEnv(ACCOUNT_SEED_ENV))?;
        let rpc_url =
            std::env::var(RPC_URL_ENV).map_err(|_| ChainError::MissingEnv(RPC_URL_ENV))?;
        Ok(Self {
            seed_phrase,
            rpc_url,
        })
    }
}

/// Derives the deployment wallet from a BIP-39 seed phrase.
pub fn wallet_from_phrase(phrase: &str) -> Result<PrivateKeySigner, ChainError> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .build()
        .map_err(|e| ChainError::InvalidSeed(e.to_string()))
}

/// Connects a read-only provider to the given RPC endpoint.
pub fn connect(rpc_url: &str) -> Result<DynProvider, ChainError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ChainError::InvalidRpcUrl(format!("{e}")))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// Connects a provider that signs submitted transactions with the wallet.
pub fn connect_with_wallet(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> Result<DynProvider, ChainError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ChainError::InvalidRpcUrl(format!("{e}")))?;
    let wallet = EthereumWallet::from(signer);
    Ok(ProviderBuilder::new().wallet(wallet).connect_http(url).erased())
}

/// Publishes creation bytecode and waits for the deployment receipt.
///
/// The contract address comes from the receipt; a receipt without one is a
/// deployment failure.
pub async fn deploy_contract(
    provider: &DynProvider,
    bytecode: Bytes,
) -> Result<(Address, TransactionReceipt), ChainError> {
    let tx = TransactionRequest::default().input(bytecode.into());
    let receipt = provider
        .send_transaction(tx)
        .await
        .map_err(|e| ChainError::Rpc(format!("failed to send transaction: {e}")))?
        .get_receipt()
        .await
        .map_err(|e| ChainError::Rpc(format!("failed to get receipt: {e}")))?;
    let address = receipt
        .contract_address
        .ok_or(ChainError::MissingContractAddress)?;
    Ok((address, receipt))
}
