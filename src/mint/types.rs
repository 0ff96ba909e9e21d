//! Mint request, contract state snapshot and pipeline stages.

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::blockchain::types::{ClientError, ClientResult};

/// Validated mint input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintRequest {
    pub recipient: Address,
    /// Amount in the token's smallest unit.
    pub amount: U256,
}

impl MintRequest {
    pub fn new(recipient: &str, amount: U256) -> ClientResult<Self> {
        Ok(Self {
            recipient: parse_address(recipient)?,
            amount,
        })
    }

    /// Validate textual input from the HTTP or CLI surface.
    ///
    /// `amount` must be a non-negative decimal integer.
    pub fn parse(recipient: &str, amount: &str) -> ClientResult<Self> {
        let amount = amount.trim();
        if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClientError::Validation(format!(
                "amount must be a non-negative integer, got '{}'",
                amount
            )));
        }
        let amount = U256::from_str_radix(amount, 10).map_err(|e| {
            ClientError::Validation(format!("amount out of range: {}", e))
        })?;

        Self::new(recipient, amount)
    }
}

/// Parse a `0x`-prefixed address. Mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> ClientResult<Address> {
    let invalid = || ClientError::Validation(format!("invalid address '{}'", input));

    let hex = input.strip_prefix("0x").ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(input, None).map_err(|_| {
            ClientError::Validation(format!("invalid address checksum '{}'", input))
        })
    } else {
        input.parse().map_err(|_| invalid())
    }
}

/// Snapshot of the token contract, read fresh for every mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractState {
    pub paused: bool,
    pub owner: Address,
    /// `None` when the read failed; informational only.
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// Authorize a mint against the snapshot: not paused, and the signer is the owner.
pub fn authorize(state: &ContractState, signer: Address) -> ClientResult<()> {
    if state.paused {
        return Err(ClientError::ContractPaused);
    }
    if state.owner != signer {
        return Err(ClientError::Unauthorized {
            owner: state.owner,
            signer,
        });
    }
    Ok(())
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStage {
    Validate,
    VerifyContract,
    ReadState,
    Authorize,
    Simulate,
    Construct,
    Sign,
    Submit,
    AwaitReceipt,
    Interpret,
}

impl MintStage {
    pub fn as_str(self) -> &'static str {
        match self {
            MintStage::Validate => "validate",
            MintStage::VerifyContract => "verify_contract",
            MintStage::ReadState => "read_state",
            MintStage::Authorize => "authorize",
            MintStage::Simulate => "simulate",
            MintStage::Construct => "construct",
            MintStage::Sign => "sign",
            MintStage::Submit => "submit",
            MintStage::AwaitReceipt => "await_receipt",
            MintStage::Interpret => "interpret",
        }
    }
}

impl std::fmt::Display for MintStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
