//! Signing key ownership and nonce issuance.
//!
//! # Security
//! - The private key is held only by the signer inside [`Wallet`]
//! - Keys are never logged, serialized or printed by `Debug`
//!
//! # Nonce discipline
//! Only one nonce lease exists at a time per wallet. A mint holds the lease
//! from the nonce read until the node accepts the signed transaction, so two
//! concurrent mints from the same signer can never pick the same nonce.

use alloy::consensus::{SignableTransaction, TxEip1559};
use alloy::network::TxSignerSync;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::blockchain::transaction::SignedTransaction;
use crate::blockchain::types::{ClientError, ClientResult};

/// Environment variable the binary reads the private key from.
pub const PRIVATE_KEY_ENV_VAR: &str = "TOKEN_CLIENT_PRIVATE_KEY";

/// Wallet for transaction signing with serialized nonce management.
#[derive(Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Next nonce this wallet expects to use, once known.
    nonce: Arc<Mutex<Option<u64>>>,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for transaction signing
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> ClientResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        // The parse error message is kept generic so no key material leaks.
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|_| ClientError::Config("Invalid private key format".to_string()))?;

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self {
            signer,
            nonce: Arc::new(Mutex::new(None)),
            chain_id,
        })
    }

    /// Load wallet from the `TOKEN_CLIENT_PRIVATE_KEY` environment variable.
    pub fn from_env(chain_id: u64) -> ClientResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            ClientError::Config(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key, chain_id)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Acquire the exclusive nonce lease, waiting for any mint in flight.
    pub async fn lease_nonce(&self) -> NonceLease<'_> {
        NonceLease {
            next: self.nonce.lock().await,
        }
    }

    /// Next locally tracked nonce, if any transaction has been submitted.
    #[cfg(test)]
    pub(crate) async fn current_nonce(&self) -> Option<u64> {
        *self.nonce.lock().await
    }

    /// Sign an EIP-1559 transaction and encode it for `eth_sendRawTransaction`.
    pub fn sign(&self, mut tx: TxEip1559) -> ClientResult<SignedTransaction> {
        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| ClientError::Signing(e.to_string()))?;

        Ok(SignedTransaction::from_signed(tx.into_signed(signature)))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

/// Exclusive right to pick and consume the wallet's next nonce.
///
/// Dropping the lease without calling [`NonceLease::commit`] leaves the
/// tracked nonce untouched.
pub struct NonceLease<'a> {
    next: MutexGuard<'a, Option<u64>>,
}

impl NonceLease<'_> {
    /// Choose the nonce for the next transaction.
    ///
    /// Takes the larger of the node's pending count and the local tracker so
    /// a transaction still propagating is never reused.
    pub fn reserve(&self, chain_nonce: u64) -> u64 {
        match *self.next {
            Some(local) if local > chain_nonce => local,
            _ => chain_nonce,
        }
    }

    /// Record that `nonce` was accepted by the node.
    pub fn commit(mut self, nonce: u64) {
        *self.next = Some(nonce + 1);
    }
}
