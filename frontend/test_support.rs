//! Test doubles shared by the frontend unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::{
    contracts::ContractData,
    provider::{ContractCall, ProviderError, Receipt, WalletProvider},
};

/// What the mock wallet does with a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Confirmed,
    NullReceipt,
    Error,
}

/// Records every call and answers reads with fixed values: stored value
/// 42, balance 1 ETH, chain id 420420421.
pub struct MockWallet {
    outcome: SubmitOutcome,
    calls: Mutex<Vec<ContractCall>>,
    fetches: AtomicUsize,
}

impl MockWallet {
    pub fn new(outcome: SubmitOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `retrieve` reads issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Ok(420420421)
    }

    async fn balance_of(&self, _address: Address) -> Result<U256, ProviderError> {
        Ok(U256::from(10).pow(U256::from(18)))
    }

    async fn retrieve(&self, _contract: &ContractData) -> Result<U256, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(U256::from(42))
    }

    async fn submit(
        &self,
        _contract: &ContractData,
        call: ContractCall,
    ) -> Result<Option<Receipt>, ProviderError> {
        self.calls.lock().unwrap().push(call);
        match self.outcome {
            SubmitOutcome::Confirmed => Ok(Some(Receipt {
                transaction_hash: B256::ZERO,
                block_number: Some(1),
            })),
            SubmitOutcome::NullReceipt => Ok(None),
            SubmitOutcome::Error => Err(ProviderError::Rpc("user rejected".to_string())),
        }
    }
}

/// The Storage contract as the frontend sees it after export.
pub fn storage_contract() -> ContractData {
    let abi = serde_json::from_str(
        r#"[
            {"type":"function","name":"retrieve","inputs":[],"outputs":[{"name":"","type":"uint256","internalType":"uint256"}],"stateMutability":"view"},
            {"type":"function","name":"store","inputs":[{"name":"num","type":"uint256","internalType":"uint256"}],"outputs":[],"stateMutability":"nonpayable"},
            {"type":"function","name":"addMoney","inputs":[{"name":"num","type":"uint256","internalType":"uint256"}],"outputs":[],"stateMutability":"payable"}
        ]"#,
    )
    .expect("static ABI parses");
    ContractData {
        name: "Storage".to_string(),
        address: Address::from([0x42; 20]),
        abi,
    }
}
