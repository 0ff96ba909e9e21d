//! ERC20 mint client library.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod mint;
pub mod normalize;
pub mod observability;
pub mod resilience;

pub use blockchain::{ChainConnection, ClientError, ClientResult};
pub use config::schema::ClientConfig;
pub use http::HttpServer;
pub use mint::{ContractState, MintRequest, TokenClient};
pub use normalize::{normalize, ChainValue, NormalizedReceipt};
