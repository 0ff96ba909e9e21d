//! Transaction construction and the signed artifact.
//!
//! # Responsibilities
//! - Build EIP-1559 transactions for a contract call
//! - Carry the signed, encoded transaction to submission
//!
//! A [`SignedTransaction`] is single use: it is built for one nonce, submitted
//! at most once, and dropped if submission fails.

use alloy::consensus::{Signed, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

/// Fixed gas limit for `mint` calls.
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

/// Parameters fetched from the chain for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxParams {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Current gas price, used as the fee cap.
    pub max_fee_per_gas: u128,
}

/// Build an unsigned EIP-1559 call to `to` carrying `input`.
///
/// Fees are not optimized: the fee cap and the priority fee both equal the
/// node's gas price quote.
pub fn build_call(to: Address, input: Bytes, params: &TxParams) -> TxEip1559 {
    TxEip1559 {
        chain_id: params.chain_id,
        nonce: params.nonce,
        gas_limit: params.gas_limit,
        max_fee_per_gas: params.max_fee_per_gas,
        max_priority_fee_per_gas: params.max_fee_per_gas,
        to: TxKind::Call(to),
        value: U256::ZERO,
        access_list: Default::default(),
        input,
    }
}

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Clone)]
pub struct SignedTransaction {
    nonce: u64,
    hash: TxHash,
    raw: Bytes,
}

impl SignedTransaction {
    pub(crate) fn from_signed(signed: Signed<TxEip1559>) -> Self {
        let nonce = signed.tx().nonce;
        let hash = *signed.hash();
        let raw = Bytes::from(TxEnvelope::from(signed).encoded_2718());

        Self { nonce, hash, raw }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Transaction hash, known before submission.
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// EIP-2718 encoded bytes.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }
}

impl std::fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedTransaction")
            .field("hash", &self.hash)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}
