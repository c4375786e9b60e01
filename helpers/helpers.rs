//! Common helper functions for the contract scripts, the frontend and tests.

pub mod artifacts;
pub mod chain;
pub mod registry;
pub mod solc;
