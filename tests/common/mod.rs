//! Shared utilities for integration testing: an in-process JSON-RPC node
//! hosting one ERC20-style token.

#![allow(dead_code)]

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::dyn_abi::DynSolValue;
use alloy::eips::eip2718::Decodable2718;
use alloy::hex;
use alloy::primitives::{address, keccak256, Address, Bytes, B256, U256};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use token_client::config::ClientConfig;

/// Anvil's first development account.
pub const SIGNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const SIGNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const TOKEN: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub const CHAIN_ID: u64 = 31337;

const SEL_NAME: [u8; 4] = [0x06, 0xfd, 0xde, 0x03];
const SEL_SYMBOL: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];
const SEL_OWNER: [u8; 4] = [0x8d, 0xa5, 0xcb, 0x5b];
const SEL_PAUSED: [u8; 4] = [0x5c, 0x97, 0x5a, 0xbb];
const SEL_BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
pub const SEL_MINT: [u8; 4] = [0x40, 0xc1, 0x0f, 0x19];
const SEL_ERROR_STRING: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Behaviour knobs and observable state of the mock node.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub chain_id: u64,
    pub code: Bytes,
    pub owner: Address,
    pub paused: bool,
    /// `None` makes the call revert.
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub owner_call_fails: bool,
    /// Revert reason returned when `mint` is simulated.
    pub mint_revert: Option<String>,
    /// Mined transactions get status 0.
    pub revert_on_chain: bool,
    /// Receipt lookups answering `null` before the receipt appears.
    pub pending_polls: u32,
    pub never_mine: bool,
    /// Report a pending nonce of 0 regardless of submissions.
    pub stale_pending_nonce: bool,
    pub gas_price: u128,
    pub block_number: u64,

    pub balances: HashMap<Address, U256>,
    pub nonce: u64,
    /// Every JSON-RPC method called, in order.
    pub calls: Vec<String>,
    /// Selectors of every `eth_call`, in order.
    pub call_selectors: Vec<[u8; 4]>,
    /// Nonces of accepted raw transactions.
    pub submitted_nonces: Vec<u64>,
    pub receipts: HashMap<B256, Value>,
    pub receipt_polls: HashMap<B256, u32>,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID,
            code: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
            owner: SIGNER,
            paused: false,
            name: Some("HFT Token".to_string()),
            symbol: Some("HFT".to_string()),
            owner_call_fails: false,
            mint_revert: None,
            revert_on_chain: false,
            pending_polls: 0,
            never_mine: false,
            stale_pending_nonce: false,
            gas_price: 1_000_000_000,
            block_number: 1,
            balances: HashMap::new(),
            nonce: 0,
            calls: Vec::new(),
            call_selectors: Vec::new(),
            submitted_nonces: Vec::new(),
            receipts: HashMap::new(),
            receipt_polls: HashMap::new(),
        }
    }
}

/// A running mock node.
pub struct MockNode {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<NodeState>>,
}

impl MockNode {
    pub async fn start(state: NodeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new()
            .route("/", post(handle_rpc))
            .with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this node with fast polling.
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.chain.rpc_url = self.url();
        config.chain.chain_id = CHAIN_ID;
        config.chain.rpc_timeout_secs = 2;
        config.token.address = TOKEN.to_string();
        config.token.artifact_path =
            concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/HFTToken.json").to_string();
        config.transaction.poll_interval_ms = 20;
        config.transaction.receipt_timeout_secs = 2;
        config.retries.max_retries = 1;
        config.retries.base_delay_ms = 10;
        config.retries.max_delay_ms = 20;
        config
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn called(&self, method: &str) -> bool {
        self.calls().iter().any(|m| m == method)
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|m| *m == method).count()
    }

    pub fn mint_simulated(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .call_selectors
            .iter()
            .any(|s| *s == SEL_MINT)
    }

    pub fn balance(&self, holder: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&holder)
            .copied()
            .unwrap_or_default()
    }

    pub fn submitted_nonces(&self) -> Vec<u64> {
        self.state.lock().unwrap().submitted_nonces.clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut NodeState)) {
        f(&mut self.state.lock().unwrap());
    }
}

async fn handle_rpc(
    State(state): State<Arc<Mutex<NodeState>>>,
    Json(request): Json<Value>,
) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();

    let outcome = {
        let mut node = state.lock().unwrap();
        node.calls.push(method.clone());
        dispatch(&mut node, &method, &params)
    };

    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    })
}

fn quantity(n: impl Into<u128>) -> Value {
    json!(format!("0x{:x}", n.into()))
}

fn word(values: Vec<DynSolValue>) -> Value {
    json!(hex::encode_prefixed(
        DynSolValue::Tuple(values).abi_encode_params()
    ))
}

fn revert(reason: &str) -> Value {
    let mut data = SEL_ERROR_STRING.to_vec();
    data.extend(DynSolValue::Tuple(vec![DynSolValue::String(reason.to_string())]).abi_encode_params());
    json!({
        "code": 3,
        "message": format!("execution reverted: {}", reason),
        "data": hex::encode_prefixed(data),
    })
}

fn dispatch(node: &mut NodeState, method: &str, params: &Value) -> Result<Value, Value> {
    match method {
        "eth_chainId" => Ok(quantity(node.chain_id)),
        "eth_blockNumber" => Ok(quantity(node.block_number)),
        "eth_gasPrice" => Ok(quantity(node.gas_price)),
        "eth_getCode" => {
            let target: Address = params[0].as_str().unwrap_or_default().parse().unwrap_or_default();
            if target == TOKEN {
                Ok(json!(hex::encode_prefixed(&node.code)))
            } else {
                Ok(json!("0x"))
            }
        }
        "eth_getTransactionCount" => {
            if node.stale_pending_nonce {
                Ok(quantity(0u64))
            } else {
                Ok(quantity(node.nonce))
            }
        }
        "eth_call" => eth_call(node, &params[0]),
        "eth_sendRawTransaction" => send_raw(node, params[0].as_str().unwrap_or_default()),
        "eth_getTransactionReceipt" => {
            let hash: B256 = params[0].as_str().unwrap_or_default().parse().unwrap_or_default();
            if node.never_mine {
                return Ok(Value::Null);
            }
            let polls = node.receipt_polls.entry(hash).or_insert(0);
            if *polls < node.pending_polls {
                *polls += 1;
                return Ok(Value::Null);
            }
            Ok(node.receipts.get(&hash).cloned().unwrap_or(Value::Null))
        }
        other => Err(json!({ "code": -32601, "message": format!("method {} not found", other) })),
    }
}

fn eth_call(node: &mut NodeState, tx: &Value) -> Result<Value, Value> {
    let input = tx
        .get("input")
        .or_else(|| tx.get("data"))
        .and_then(Value::as_str)
        .unwrap_or("0x");
    let input = hex::decode(input).unwrap_or_default();
    if input.len() < 4 {
        return Err(revert("empty call"));
    }
    let selector: [u8; 4] = [input[0], input[1], input[2], input[3]];
    node.call_selectors.push(selector);

    match selector {
        SEL_NAME => node
            .name
            .clone()
            .map(|n| word(vec![DynSolValue::String(n)]))
            .ok_or_else(|| revert("name unavailable")),
        SEL_SYMBOL => node
            .symbol
            .clone()
            .map(|s| word(vec![DynSolValue::String(s)]))
            .ok_or_else(|| revert("symbol unavailable")),
        SEL_OWNER if node.owner_call_fails => {
            Err(json!({ "code": -32000, "message": "header not found" }))
        }
        SEL_OWNER => Ok(word(vec![DynSolValue::Address(node.owner)])),
        SEL_PAUSED => Ok(word(vec![DynSolValue::Bool(node.paused)])),
        SEL_BALANCE_OF => {
            let holder = Address::from_slice(&input[16..36]);
            let balance = node.balances.get(&holder).copied().unwrap_or_default();
            Ok(word(vec![DynSolValue::Uint(balance, 256)]))
        }
        SEL_MINT => match &node.mint_revert {
            Some(reason) => Err(revert(reason)),
            None => Ok(json!("0x")),
        },
        _ => Err(revert("unknown selector")),
    }
}

fn send_raw(node: &mut NodeState, raw_hex: &str) -> Result<Value, Value> {
    let raw = hex::decode(raw_hex).map_err(|e| json!({ "code": -32602, "message": e.to_string() }))?;
    let envelope = TxEnvelope::decode_2718(&mut raw.as_slice())
        .map_err(|e| json!({ "code": -32602, "message": e.to_string() }))?;

    if envelope.chain_id() != Some(node.chain_id) {
        return Err(json!({ "code": -32000, "message": "invalid chain id" }));
    }
    if envelope.nonce() != node.nonce {
        return Err(json!({
            "code": -32000,
            "message": format!("nonce too low: expected {}, got {}", node.nonce, envelope.nonce())
        }));
    }

    let input = envelope.input();
    let hash = keccak256(&raw);
    let is_mint = input.len() == 68 && input[..4] == SEL_MINT;
    let success = is_mint && !node.revert_on_chain && !node.paused;

    node.nonce += 1;
    node.block_number += 1;
    node.submitted_nonces.push(envelope.nonce());

    let mut logs = Vec::new();
    if success {
        let recipient = Address::from_slice(&input[16..36]);
        let amount = U256::from_be_slice(&input[36..68]);
        *node.balances.entry(recipient).or_default() += amount;
        logs.push(json!({
            "address": TOKEN.to_string(),
            "topics": [
                hex::encode_prefixed(keccak256("Transfer(address,address,uint256)")),
                hex::encode_prefixed(B256::ZERO),
                hex::encode_prefixed(recipient.into_word()),
            ],
            "data": hex::encode_prefixed(amount.to_be_bytes::<32>()),
            "blockHash": hex::encode_prefixed(B256::repeat_byte(0x11)),
            "blockNumber": quantity(node.block_number),
            "transactionHash": hex::encode_prefixed(hash),
            "transactionIndex": "0x0",
            "logIndex": "0x0",
            "removed": false,
        }));
    }

    let receipt = json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0xb8a0",
        "logs": logs,
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": hex::encode_prefixed(hash),
        "transactionIndex": "0x0",
        "blockHash": hex::encode_prefixed(B256::repeat_byte(0x11)),
        "blockNumber": quantity(node.block_number),
        "gasUsed": "0xb8a0",
        "effectiveGasPrice": quantity(node.gas_price),
        "from": SIGNER.to_string(),
        "to": TOKEN.to_string(),
        "contractAddress": null,
    });
    node.receipts.insert(hash, receipt);

    Ok(json!(hex::encode_prefixed(hash)))
}
