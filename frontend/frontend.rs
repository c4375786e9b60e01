//! Frontend for the Storage contract: wallet detection, contract state
//! reads, and the two transaction forms (store a number, add money).
//!
//! All chain interaction goes through the [`provider::WalletProvider`]
//! seam; when no wallet is configured the app shows a static notice and
//! never touches the chain.

pub mod contracts;
pub mod network;
pub mod provider;
pub mod tx_form;

#[cfg(test)]
pub(crate) mod test_support;
