//! Contract artifact loading and ABI binding.
//!
//! Reads the `abi` field of a compiled artifact (forge or hardhat layout)
//! and binds it to the token address.

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, Bytes};
use serde::Deserialize;
use std::path::Path;

use crate::blockchain::types::{ClientError, ClientResult};

/// Functions the mint pipeline cannot run without.
pub const REQUIRED_FUNCTIONS: [&str; 3] = ["mint", "owner", "paused"];

/// Only the ABI is read; other artifact fields such as `bytecode` are ignored.
#[derive(Debug, Deserialize)]
struct ArtifactFile {
    abi: JsonAbi,
}

/// A compiled contract's ABI.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    abi: JsonAbi,
}

impl ContractArtifact {
    /// Load an artifact from disk.
    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!(
                "Cannot read contract artifact {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ClientError::Config(msg) => {
                ClientError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse an artifact from its JSON text.
    pub fn from_json(content: &str) -> ClientResult<Self> {
        let file: ArtifactFile = serde_json::from_str(content)
            .map_err(|e| ClientError::Config(format!("Malformed contract artifact: {}", e)))?;

        let missing: Vec<&str> = REQUIRED_FUNCTIONS
            .iter()
            .copied()
            .filter(|name| file.abi.function(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ClientError::Config(format!(
                "Contract ABI is missing functions: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { abi: file.abi })
    }
}

/// ABI bound to a deployed address.
#[derive(Debug, Clone)]
pub struct TokenContract {
    address: Address,
    artifact: ContractArtifact,
}

impl TokenContract {
    pub fn new(address: Address, artifact: ContractArtifact) -> Self {
        Self { address, artifact }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Look up a function by name (first overload).
    pub fn function(&self, name: &str) -> ClientResult<&Function> {
        self.artifact
            .abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| ClientError::Abi(format!("Function {} not in contract ABI", name)))
    }

    /// Encode a call to `name` with `args`.
    pub fn encode_call(&self, name: &str, args: &[DynSolValue]) -> ClientResult<Bytes> {
        let function = self.function(name)?;
        function
            .abi_encode_input(args)
            .map(Bytes::from)
            .map_err(|e| ClientError::Abi(format!("Cannot encode {}: {}", name, e)))
    }

    /// Decode the return data of `name`.
    pub fn decode_output(&self, name: &str, data: &[u8]) -> ClientResult<Vec<DynSolValue>> {
        let function = self.function(name)?;
        function
            .abi_decode_output(data)
            .map_err(|e| ClientError::Abi(format!("Cannot decode {} output: {}", name, e)))
    }
}
