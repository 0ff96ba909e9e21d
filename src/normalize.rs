//! Conversion of chain response values into JSON-safe values.
//!
//! Hashes, blooms and raw byte strings become `0x`-prefixed hex strings.
//! Maps keep their keys and insertion order, sequences keep their order,
//! everything else passes through unchanged.

use alloy::hex;
use alloy::primitives::{Address, Bloom, Bytes, FixedBytes};
use alloy::rpc::types::{Log, TransactionReceipt};
use serde::Serialize;
use serde_json::{Map, Value};

/// A chain response value before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainValue {
    /// Ordered key/value pairs.
    Map(Vec<(String, ChainValue)>),
    Seq(Vec<ChainValue>),
    /// Anything with a hex rendering: hashes, blooms, call data.
    Bytes(Bytes),
    /// Already JSON-safe.
    Plain(Value),
}

impl ChainValue {
    /// Build a map from ordered pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ChainValue)>,
    {
        ChainValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Normalize a chain value into JSON. Total over all inputs.
pub fn normalize(value: ChainValue) -> Value {
    match value {
        ChainValue::Map(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(key, normalize(value));
            }
            Value::Object(map)
        }
        ChainValue::Seq(items) => Value::Array(items.into_iter().map(normalize).collect()),
        ChainValue::Bytes(bytes) => Value::String(hex::encode_prefixed(bytes)),
        ChainValue::Plain(value) => value,
    }
}

impl From<Bytes> for ChainValue {
    fn from(bytes: Bytes) -> Self {
        ChainValue::Bytes(bytes)
    }
}

impl<const N: usize> From<FixedBytes<N>> for ChainValue {
    fn from(bytes: FixedBytes<N>) -> Self {
        ChainValue::Bytes(Bytes::copy_from_slice(bytes.as_slice()))
    }
}

impl From<Bloom> for ChainValue {
    fn from(bloom: Bloom) -> Self {
        ChainValue::Bytes(Bytes::copy_from_slice(bloom.as_slice()))
    }
}

/// Addresses stay as EIP-55 checksummed strings.
impl From<Address> for ChainValue {
    fn from(address: Address) -> Self {
        ChainValue::Plain(Value::String(address.to_checksum(None)))
    }
}

impl From<u64> for ChainValue {
    fn from(n: u64) -> Self {
        ChainValue::Plain(n.into())
    }
}

/// Values beyond `u64` are rendered as decimal strings.
impl From<u128> for ChainValue {
    fn from(n: u128) -> Self {
        match u64::try_from(n) {
            Ok(small) => ChainValue::Plain(small.into()),
            Err(_) => ChainValue::Plain(Value::String(n.to_string())),
        }
    }
}

impl From<bool> for ChainValue {
    fn from(b: bool) -> Self {
        ChainValue::Plain(Value::Bool(b))
    }
}

impl From<String> for ChainValue {
    fn from(s: String) -> Self {
        ChainValue::Plain(Value::String(s))
    }
}

impl<T: Into<ChainValue>> From<Option<T>> for ChainValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ChainValue::Plain(Value::Null), Into::into)
    }
}

impl<T: Into<ChainValue>> From<Vec<T>> for ChainValue {
    fn from(items: Vec<T>) -> Self {
        ChainValue::Seq(items.into_iter().map(Into::into).collect())
    }
}

fn log_value(log: &Log) -> ChainValue {
    ChainValue::map([
        ("address", log.address().into()),
        ("topics", log.topics().to_vec().into()),
        ("data", log.data().data.clone().into()),
        ("blockHash", log.block_hash.into()),
        ("blockNumber", log.block_number.into()),
        ("transactionHash", log.transaction_hash.into()),
        ("transactionIndex", log.transaction_index.into()),
        ("logIndex", log.log_index.into()),
        ("removed", log.removed.into()),
    ])
}

/// Receipt fields in web3 naming and order.
pub fn receipt_value(receipt: &TransactionReceipt) -> ChainValue {
    let logs: Vec<ChainValue> = receipt.inner.logs().iter().map(log_value).collect();

    ChainValue::map([
        ("transactionHash", receipt.transaction_hash.into()),
        ("transactionIndex", receipt.transaction_index.into()),
        ("blockHash", receipt.block_hash.into()),
        ("blockNumber", receipt.block_number.into()),
        ("from", receipt.from.into()),
        ("to", receipt.to.into()),
        ("contractAddress", receipt.contract_address.into()),
        ("cumulativeGasUsed", receipt.inner.cumulative_gas_used().into()),
        ("gasUsed", receipt.gas_used.into()),
        ("effectiveGasPrice", receipt.effective_gas_price.into()),
        ("logsBloom", (*receipt.inner.logs_bloom()).into()),
        ("logs", ChainValue::Seq(logs)),
        ("status", u64::from(receipt.status()).into()),
        ("type", u64::from(receipt.inner.tx_type() as u8).into()),
    ])
}

/// A receipt after normalization: a JSON object with hex-encoded byte fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedReceipt(Value);

impl NormalizedReceipt {
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self(normalize(receipt_value(receipt)))
    }

    /// 1 for success, 0 for failure.
    pub fn status(&self) -> Option<u64> {
        self.0.get("status").and_then(Value::as_u64)
    }

    pub fn transaction_hash(&self) -> Option<&str> {
        self.0.get("transactionHash").and_then(Value::as_str)
    }

    pub fn block_number(&self) -> Option<u64> {
        self.0.get("blockNumber").and_then(Value::as_u64)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}
