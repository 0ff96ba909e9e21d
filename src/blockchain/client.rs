//! Chain connection: RPC endpoint, signer and bound token contract.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint and verify the chain ID
//! - Read contract code and view-function results
//! - Fetch nonce and gas price, build and sign transactions
//! - Submit raw transactions and wait for receipts
//!
//! Every RPC is bounded by the configured timeout. Read-only calls are
//! retried on transient failures; `eth_sendRawTransaction` never is.

use alloy::dyn_abi::DynSolValue;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::TransportResult;
use std::future::IntoFuture;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

use crate::blockchain::artifact::{ContractArtifact, TokenContract};
use crate::blockchain::transaction::{build_call, SignedTransaction, TxParams};
use crate::blockchain::types::{ChainId, ClientError, ClientResult};
use crate::blockchain::wallet::{NonceLease, Wallet};
use crate::config::ClientConfig;
use crate::resilience::{with_retries, RetryPolicy};

/// Connection to one chain, one signer and one token contract.
#[derive(Clone)]
pub struct ChainConnection {
    provider: Arc<dyn Provider + Send + Sync>,
    wallet: Wallet,
    contract: TokenContract,
    chain_id: u64,
    rpc_timeout: Duration,
    retry: RetryPolicy,
    gas_limit: u64,
    receipt_timeout: Duration,
    poll_interval: Duration,
}

impl ChainConnection {
    /// Load the artifact, parse the key, and connect to the endpoint.
    ///
    /// # Errors
    /// - `Config` for a missing or malformed artifact, key or address, or a
    ///   chain ID different from the configured one
    /// - `Connection` / `Timeout` when the endpoint is unreachable
    pub async fn connect(config: &ClientConfig, private_key: &str) -> ClientResult<Self> {
        let wallet = Wallet::from_private_key(private_key, config.chain.chain_id)?;
        Self::connect_with_wallet(config, wallet).await
    }

    /// Connect with an already constructed wallet.
    pub async fn connect_with_wallet(config: &ClientConfig, wallet: Wallet) -> ClientResult<Self> {
        if wallet.chain_id() != config.chain.chain_id {
            return Err(ClientError::Config(format!(
                "Wallet chain ID {} does not match configured chain ID {}",
                wallet.chain_id(),
                config.chain.chain_id
            )));
        }

        let rpc_url: url::Url = config.chain.rpc_url.parse().map_err(|e| {
            ClientError::Config(format!("Invalid RPC URL '{}': {}", config.chain.rpc_url, e))
        })?;
        let token_address: Address = config.token.address.parse().map_err(|e| {
            ClientError::Config(format!(
                "Invalid token address '{}': {}",
                config.token.address, e
            ))
        })?;

        let artifact = ContractArtifact::load(Path::new(&config.token.artifact_path))?;

        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(
            ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_http(rpc_url),
        );

        let connection = Self {
            provider,
            wallet,
            contract: TokenContract::new(token_address, artifact),
            chain_id: config.chain.chain_id,
            rpc_timeout: Duration::from_secs(config.chain.rpc_timeout_secs),
            retry: RetryPolicy::from(&config.retries),
            gas_limit: config.transaction.gas_limit,
            receipt_timeout: Duration::from_secs(config.transaction.receipt_timeout_secs),
            poll_interval: Duration::from_millis(config.transaction.poll_interval_ms),
        };

        connection.verify_chain_id().await?;

        tracing::info!(
            rpc_url = %config.chain.rpc_url,
            chain_id = config.chain.chain_id,
            token = %token_address,
            signer = %connection.signer_address(),
            "Chain connection initialized"
        );

        Ok(connection)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ClientResult<()> {
        let actual = self.get_chain_id().await?;
        if actual.0 != self.chain_id {
            return Err(ClientError::Config(format!(
                "Chain ID mismatch: expected {}, got {}",
                self.chain_id, actual.0
            )));
        }
        Ok(())
    }

    /// Run one read-only RPC with a timeout, retrying transient failures.
    async fn read<T, F, Fut>(&self, method: &'static str, op: F) -> ClientResult<T>
    where
        F: Fn() -> Fut,
        Fut: IntoFuture<Output = TransportResult<T>>,
    {
        let op = &op;
        let this = self;
        with_retries(&self.retry, method, move || async move {
            this.once(method, op()).await
        })
        .await
    }

    /// Run one RPC with a timeout and no retry.
    async fn once<T, Fut>(&self, method: &'static str, fut: Fut) -> ClientResult<T>
    where
        Fut: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.rpc_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ClientError::from_rpc(method, e)),
            Err(_) => Err(ClientError::Timeout {
                method,
                secs: self.rpc_timeout.as_secs(),
            }),
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> ClientResult<ChainId> {
        self.read("eth_chainId", || self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn block_number(&self) -> ClientResult<u64> {
        self.read("eth_blockNumber", || self.provider.get_block_number())
            .await
    }

    /// Check if the endpoint answers.
    pub async fn is_healthy(&self) -> bool {
        self.once("eth_blockNumber", self.provider.get_block_number())
            .await
            .is_ok()
    }

    /// Deployed bytecode at `address` (empty if none).
    pub async fn get_code(&self, address: Address) -> ClientResult<Bytes> {
        self.read("eth_getCode", || self.provider.get_code_at(address))
            .await
    }

    /// Pending transaction count for the signer.
    pub async fn pending_nonce(&self) -> ClientResult<u64> {
        let signer = self.signer_address();
        self.read("eth_getTransactionCount", || {
            self.provider.get_transaction_count(signer).pending()
        })
        .await
    }

    /// Current gas price in wei.
    pub async fn gas_price(&self) -> ClientResult<u128> {
        self.read("eth_gasPrice", || self.provider.get_gas_price())
            .await
    }

    /// `eth_call` of raw call data against the token, sent from the signer.
    pub async fn call(&self, input: Bytes) -> ClientResult<Bytes> {
        let request = TransactionRequest::default()
            .with_from(self.signer_address())
            .with_to(self.contract.address())
            .with_input(input);
        self.read("eth_call", || self.provider.call(request.clone()))
            .await
    }

    /// Call a view function on the token and decode its outputs.
    pub async fn call_view(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> ClientResult<Vec<DynSolValue>> {
        let input = self.contract.encode_call(function, args)?;
        let output = self.call(input).await?;
        self.contract.decode_output(function, &output)
    }

    /// Simulate a state-changing call without mutating chain state.
    ///
    /// A node-side rejection becomes `Simulation` carrying the revert reason,
    /// or the node's message when no reason is encoded.
    pub async fn simulate(&self, input: Bytes) -> ClientResult<()> {
        match self.call(input).await {
            Ok(_) => Ok(()),
            Err(ClientError::Rpc {
                message,
                revert_reason,
                ..
            }) => Err(ClientError::Simulation {
                reason: revert_reason.unwrap_or(message),
            }),
            Err(e) => Err(e),
        }
    }

    /// Acquire the signer's nonce lease.
    pub async fn lease_nonce(&self) -> NonceLease<'_> {
        self.wallet.lease_nonce().await
    }

    /// Build an unsigned call to the token with the configured gas limit.
    pub fn build_transaction(
        &self,
        nonce: u64,
        gas_price: u128,
        input: Bytes,
    ) -> alloy::consensus::TxEip1559 {
        let params = TxParams {
            chain_id: self.chain_id,
            nonce,
            gas_limit: self.gas_limit,
            max_fee_per_gas: gas_price,
        };
        build_call(self.contract.address(), input, &params)
    }

    /// Sign with the held key.
    pub fn sign(&self, tx: alloy::consensus::TxEip1559) -> ClientResult<SignedTransaction> {
        self.wallet.sign(tx)
    }

    /// Submit a signed transaction. Not retried.
    pub async fn send_raw_transaction(&self, tx: &SignedTransaction) -> ClientResult<TxHash> {
        tracing::debug!(tx_hash = %tx.hash(), nonce = tx.nonce(), "Submitting transaction");
        let pending = self
            .once(
                "eth_sendRawTransaction",
                self.provider.send_raw_transaction(tx.raw()),
            )
            .await?;
        let tx_hash = *pending.tx_hash();
        if tx_hash != tx.hash() {
            tracing::warn!(local = %tx.hash(), node = %tx_hash, "Node returned a different transaction hash");
        }
        Ok(tx_hash)
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ClientResult<Option<TransactionReceipt>> {
        self.read("eth_getTransactionReceipt", || {
            self.provider.get_transaction_receipt(tx_hash)
        })
        .await
    }

    /// Poll until the transaction is mined or the receipt deadline passes.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> ClientResult<TransactionReceipt> {
        let deadline = Instant::now() + self.receipt_timeout;

        loop {
            if let Some(receipt) = self.get_transaction_receipt(tx_hash).await? {
                return Ok(receipt);
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(ClientError::ReceiptTimeout {
                    tx_hash,
                    secs: self.receipt_timeout.as_secs(),
                });
            }

            tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
            sleep(self.poll_interval).await;
        }
    }

    /// Address derived from the held key.
    pub fn signer_address(&self) -> Address {
        self.wallet.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn contract(&self) -> &TokenContract {
        &self.contract
    }
}

impl std::fmt::Debug for ChainConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConnection")
            .field("chain_id", &self.chain_id)
            .field("contract", &self.contract.address())
            .field("wallet", &self.wallet)
            .field("timeout_secs", &self.rpc_timeout.as_secs())
            .finish()
    }
}
