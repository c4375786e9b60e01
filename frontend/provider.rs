//! Wallet provider seam.
//!
//! [`WalletProvider`] is the only path the frontend has to the chain; ABI
//! encoding, signing and transaction plumbing behind it are owned by the
//! alloy stack. [`EthWallet::detect`] stands in for the browser-injected
//! wallet object: when the wallet configuration is absent there simply is
//! no provider, and the app falls back to a static notice.

use std::time::Duration;

use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use helpers::chain::{self, ChainError, ACCOUNT_SEED_ENV, RPC_URL_ENV};
use tracing::{debug, warn};

use crate::contracts::ContractData;

/// How long the wallet polls for a receipt before treating it as absent.
const RECEIPT_POLL_ATTEMPTS: u32 = 60;
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("contract has no {0} function")]
    MissingFunction(String),
    #[error("failed to encode call: {0}")]
    Encode(String),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("unexpected contract response: {0}")]
    BadResponse(String),
}

impl From<ChainError> for ProviderError {
    fn from(e: ChainError) -> Self {
        ProviderError::Rpc(e.to_string())
    }
}

/// One of the two contract calls the UI can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// `store(number)`, non-payable.
    Store { number: U256 },
    /// `addMoney(number)` with attached value, payable.
    AddMoney { number: U256, value: U256 },
}

/// Confirmation that a transaction was included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
}

/// Chain access as the UI sees it. `submit` resolving to `None` means the
/// transaction never produced a receipt and is displayed as a revert.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn chain_id(&self) -> Result<u64, ProviderError>;
    async fn balance_of(&self, address: Address) -> Result<U256, ProviderError>;
    async fn retrieve(&self, contract: &ContractData) -> Result<U256, ProviderError>;
    async fn submit(
        &self,
        contract: &ContractData,
        call: ContractCall,
    ) -> Result<Option<Receipt>, ProviderError>;
}

/// The real wallet: a seed-phrase signer on an HTTP provider, configured
/// through the same `ACCOUNT_SEED`/`RPC_URL` surface the scripts use.
pub struct EthWallet {
    provider: DynProvider,
}

impl EthWallet {
    /// Detects the wallet configuration. Absent configuration is not an
    /// error: the frontend runs without chain interaction.
    pub fn detect() -> Result<Option<Self>, ProviderError> {
        let (seed, rpc_url) = match (
            std::env::var(ACCOUNT_SEED_ENV),
            std::env::var(RPC_URL_ENV),
        ) {
            (Ok(seed), Ok(rpc_url)) => (seed, rpc_url),
            _ => {
                warn!("Wallet not detected");
                return Ok(None);
            }
        };
        let signer = chain::wallet_from_phrase(&seed)?;
        let provider = chain::connect_with_wallet(&rpc_url, signer)?;
        Ok(Some(Self { provider }))
    }

    fn function<'a>(
        contract: &'a ContractData,
        name: &str,
    ) -> Result<&'a Function, ProviderError> {
        contract
            .abi
            .functions
            .get(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| ProviderError::MissingFunction(name.to_string()))
    }
}

#[async_trait]
impl WalletProvider for EthWallet {
    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))
    }

    async fn balance_of(&self, address: Address) -> Result<U256, ProviderError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))
    }

    async fn retrieve(&self, contract: &ContractData) -> Result<U256, ProviderError> {
        let function = Self::function(contract, "retrieve")?;
        let data = function
            .abi_encode_input(&[])
            .map_err(|e| ProviderError::Encode(e.to_string()))?;
        let tx = TransactionRequest::default()
            .to(contract.address)
            .input(Bytes::from(data).into());
        let result = self
            .provider
            .call(tx)
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))?;
        let values = function
            .abi_decode_output(&result)
            .map_err(|e| ProviderError::BadResponse(e.to_string()))?;
        values
            .first()
            .and_then(DynSolValue::as_uint)
            .map(|(value, _)| value)
            .ok_or_else(|| ProviderError::BadResponse("retrieve returned no uint256".to_string()))
    }

    async fn submit(
        &self,
        contract: &ContractData,
        call: ContractCall,
    ) -> Result<Option<Receipt>, ProviderError> {
        let (name, args, value) = match call {
            ContractCall::Store { number } => {
                ("store", vec![DynSolValue::Uint(number, 256)], U256::ZERO)
            }
            ContractCall::AddMoney { number, value } => {
                ("addMoney", vec![DynSolValue::Uint(number, 256)], value)
            }
        };
        let function = Self::function(contract, name)?;
        let data = function
            .abi_encode_input(&args)
            .map_err(|e| ProviderError::Encode(e.to_string()))?;
        let tx = TransactionRequest::default()
            .to(contract.address)
            .input(Bytes::from(data).into())
            .value(value);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))?;
        let hash = *pending.tx_hash();
        debug!("Transaction response {hash}");

        // Poll for the receipt ourselves: a transaction that never lands
        // within the window resolves to no receipt rather than an error.
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            if let Some(receipt) = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| ProviderError::Rpc(e.to_string()))?
            {
                debug!("Transaction receipt {:?}", receipt.transaction_hash);
                return Ok(Some(Receipt {
                    transaction_hash: receipt.transaction_hash,
                    block_number: receipt.block_number,
                }));
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
        Ok(None)
    }
}
