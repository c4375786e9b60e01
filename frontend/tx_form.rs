//! Transaction form state machine: Initial -> Loading -> Success | Revert.
//!
//! Each form owns its status exclusively; a new submission implicitly
//! resets the previous outcome. While a submission is loading the inputs
//! are disabled, exactly like the form fields they model.

use alloy_primitives::U256;
use tracing::error;

use crate::{
    contracts::ContractData,
    provider::{ContractCall, WalletProvider},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Initial,
    Loading,
    Success,
    Revert,
}

impl Status {
    /// The marker the form renders next to its button.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Initial => "",
            Status::Loading => "...",
            Status::Success => "ok",
            Status::Revert => "revert",
        }
    }
}

/// One transaction form: a number input, an optional money input, and a
/// submit button.
#[derive(Debug, Default)]
pub struct TransactionForm {
    status: Status,
    number: U256,
    money: U256,
}

impl TransactionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Ignored while a submission is in flight.
    pub fn set_number(&mut self, number: U256) {
        if self.status != Status::Loading {
            self.number = number;
        }
    }

    /// Ignored while a submission is in flight.
    pub fn set_money(&mut self, money: U256) {
        if self.status != Status::Loading {
            self.money = money;
        }
    }

    /// Submits the form. A non-zero money amount selects the payable
    /// `addMoney` path with the amount attached, zero selects `store`.
    ///
    /// A receipt classifies the outcome as success, an absent receipt as a
    /// revert, and any error during signing or submission is caught and
    /// also shown as a revert; the cause is not distinguished further.
    pub async fn submit(
        &mut self,
        provider: &dyn WalletProvider,
        contract: &ContractData,
    ) -> Status {
        self.status = Status::Loading;

        let call = if self.money > U256::ZERO {
            ContractCall::AddMoney {
                number: self.number,
                value: self.money,
            }
        } else {
            ContractCall::Store {
                number: self.number,
            }
        };

        self.status = match provider.submit(contract, call).await {
            Ok(Some(_receipt)) => Status::Success,
            Ok(None) => Status::Revert,
            Err(e) => {
                error!("{e}");
                Status::Revert
            }
        };
        self.status
    }
}
