//! The mint pipeline.
//!
//! # Stages
//! ```text
//! validate → verify_contract → read_state → authorize → simulate
//!     → construct → sign → submit → await_receipt → interpret
//! ```
//!
//! Each stage either hands its output to the next or ends the pipeline with
//! a [`ClientError`]. Failures are logged and counted once, here, with the
//! stage they stopped at.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionReceipt;
use std::sync::Arc;
use std::time::Instant;

use crate::blockchain::types::{ClientError, ClientResult};
use crate::blockchain::{ChainConnection, Wallet};
use crate::config::ClientConfig;
use crate::mint::types::{authorize, parse_address, ContractState, MintRequest, MintStage};
use crate::normalize::NormalizedReceipt;
use crate::observability::metrics;

/// Mints tokens through one chain connection. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TokenClient {
    connection: Arc<ChainConnection>,
}

impl TokenClient {
    /// Connect using `config` and sign with `private_key`.
    pub async fn connect(config: &ClientConfig, private_key: &str) -> ClientResult<Self> {
        let connection = ChainConnection::connect(config, private_key).await?;
        Ok(Self::from_connection(connection))
    }

    /// Connect with the key from `TOKEN_CLIENT_PRIVATE_KEY`.
    pub async fn connect_from_env(config: &ClientConfig) -> ClientResult<Self> {
        let wallet = Wallet::from_env(config.chain.chain_id)?;
        let connection = ChainConnection::connect_with_wallet(config, wallet).await?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: ChainConnection) -> Self {
        Self {
            connection: Arc::new(connection),
        }
    }

    pub fn connection(&self) -> &ChainConnection {
        &self.connection
    }

    pub fn signer_address(&self) -> Address {
        self.connection.signer_address()
    }

    pub fn token_address(&self) -> Address {
        self.connection.contract().address()
    }

    /// Mint `amount` base units to `recipient` and wait for the receipt.
    ///
    /// # Errors
    /// `Validation` for a malformed recipient, otherwise the error of the
    /// first failing stage.
    pub async fn mint(&self, recipient: &str, amount: U256) -> ClientResult<NormalizedReceipt> {
        let start = Instant::now();
        match MintRequest::new(recipient, amount) {
            Ok(request) => self.execute(request, start).await,
            Err(e) => Err(self.fail(MintStage::Validate, e, start)),
        }
    }

    /// Mint from textual input, as received by the HTTP and CLI surfaces.
    ///
    /// `amount` must be a non-negative decimal integer.
    pub async fn mint_text(&self, recipient: &str, amount: &str) -> ClientResult<NormalizedReceipt> {
        let start = Instant::now();
        match MintRequest::parse(recipient, amount) {
            Ok(request) => self.execute(request, start).await,
            Err(e) => Err(self.fail(MintStage::Validate, e, start)),
        }
    }

    /// Record a mint rejected before its input could be read, such as a
    /// malformed request body.
    pub fn reject(&self, error: ClientError) -> ClientError {
        self.fail(MintStage::Validate, error, Instant::now())
    }

    async fn execute(&self, request: MintRequest, start: Instant) -> ClientResult<NormalizedReceipt> {
        tracing::info!(
            recipient = %request.recipient,
            amount = %request.amount,
            token = %self.token_address(),
            "Mint requested"
        );

        let mut stage = MintStage::VerifyContract;
        match self.run(&request, &mut stage).await {
            Ok(receipt) => {
                tracing::info!(
                    tx_hash = receipt.transaction_hash().unwrap_or_default(),
                    block_number = receipt.block_number(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Mint confirmed"
                );
                metrics::record_mint_success(start);
                Ok(receipt)
            }
            Err(e) => Err(self.fail(stage, e, start)),
        }
    }

    fn fail(&self, stage: MintStage, error: ClientError, start: Instant) -> ClientError {
        tracing::error!(stage = %stage, kind = error.kind(), error = %error, "Mint failed");
        metrics::record_mint_failure(stage.as_str(), error.kind(), start);
        error
    }

    /// Run the stages after validation. `stage` tracks the one in progress.
    async fn run(
        &self,
        request: &MintRequest,
        stage: &mut MintStage,
    ) -> ClientResult<NormalizedReceipt> {
        let conn = &self.connection;

        *stage = MintStage::VerifyContract;
        self.verify_contract().await?;

        *stage = MintStage::ReadState;
        let state = self.contract_state().await?;

        *stage = MintStage::Authorize;
        authorize(&state, conn.signer_address())?;
        tracing::debug!(owner = %state.owner, "Signer authorized");

        *stage = MintStage::Simulate;
        let input = self.encode_mint(request)?;
        conn.simulate(input.clone()).await?;

        // The lease is held from nonce selection until the node accepts the
        // transaction. Any early return drops it without advancing the nonce.
        *stage = MintStage::Construct;
        let lease = conn.lease_nonce().await;
        let chain_nonce = conn.pending_nonce().await?;
        let nonce = lease.reserve(chain_nonce);
        let gas_price = conn.gas_price().await?;
        let tx = conn.build_transaction(nonce, gas_price, input);

        *stage = MintStage::Sign;
        let signed = conn.sign(tx)?;

        *stage = MintStage::Submit;
        let tx_hash = conn.send_raw_transaction(&signed).await?;
        lease.commit(nonce);
        tracing::info!(tx_hash = %tx_hash, nonce, gas_price, "Transaction submitted");

        *stage = MintStage::AwaitReceipt;
        let receipt = conn.wait_for_receipt(tx_hash).await?;

        *stage = MintStage::Interpret;
        interpret(&receipt)
    }

    /// Fail with `ContractNotFound` when the token address has no code.
    async fn verify_contract(&self) -> ClientResult<()> {
        let address = self.token_address();
        let code = self.connection.get_code(address).await?;
        if code.is_empty() {
            return Err(ClientError::ContractNotFound(address));
        }
        tracing::debug!(token = %address, code_len = code.len(), "Contract code present");
        Ok(())
    }

    /// Read a fresh snapshot of the token state.
    ///
    /// `name` and `symbol` are best effort; `owner` and `paused` must succeed.
    pub async fn contract_state(&self) -> ClientResult<ContractState> {
        let name = self.optional_string("name").await;
        let symbol = self.optional_string("symbol").await;

        let owner = self
            .required_value("owner")
            .await?
            .as_address()
            .ok_or_else(|| ClientError::ContractState("owner() did not return an address".into()))?;
        let paused = self
            .required_value("paused")
            .await?
            .as_bool()
            .ok_or_else(|| ClientError::ContractState("paused() did not return a bool".into()))?;

        Ok(ContractState {
            paused,
            owner,
            name,
            symbol,
        })
    }

    async fn optional_string(&self, function: &str) -> Option<String> {
        match self.connection.call_view(function, &[]).await {
            Ok(values) => values
                .into_iter()
                .next()
                .and_then(|v| v.as_str().map(str::to_owned)),
            Err(e) => {
                tracing::warn!(function, error = %e, "Optional contract read failed");
                None
            }
        }
    }

    async fn required_value(&self, function: &str) -> ClientResult<DynSolValue> {
        let values = self
            .connection
            .call_view(function, &[])
            .await
            .map_err(|e| ClientError::ContractState(format!("{}() failed: {}", function, e)))?;
        values
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::ContractState(format!("{}() returned nothing", function)))
    }

    /// Token balance of `address` via `balanceOf`.
    pub async fn balance_of(&self, address: &str) -> ClientResult<U256> {
        let owner = parse_address(address)?;
        let values = self
            .connection
            .call_view("balanceOf", &[DynSolValue::Address(owner)])
            .await?;
        values
            .first()
            .and_then(|v| v.as_uint())
            .map(|(balance, _)| balance)
            .ok_or_else(|| ClientError::Abi("balanceOf() did not return a uint".into()))
    }

    fn encode_mint(&self, request: &MintRequest) -> ClientResult<Bytes> {
        self.connection.contract().encode_call(
            "mint",
            &[
                DynSolValue::Address(request.recipient),
                DynSolValue::Uint(request.amount, 256),
            ],
        )
    }

    pub async fn is_healthy(&self) -> bool {
        self.connection.is_healthy().await
    }
}

/// A mined receipt with status 0 is a failure.
fn interpret(receipt: &TransactionReceipt) -> ClientResult<NormalizedReceipt> {
    if !receipt.status() {
        return Err(ClientError::TransactionFailed {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        });
    }
    Ok(NormalizedReceipt::from_receipt(receipt))
}
