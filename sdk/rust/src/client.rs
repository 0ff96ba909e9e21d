use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct MintRequestBody<'a> {
    recipient: &'a str,
    amount: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfoResponse {
    pub address: String,
    pub signer: String,
    pub chain_id: u64,
    pub paused: bool,
    pub owner: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub address: String,
    /// Decimal string in base units.
    pub balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error returned by the service, with its HTTP status.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.error, self.status, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

pub struct MintApiClient {
    client: Client,
    base_url: String,
}

impl MintApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Mint `amount` base units to `recipient`. Returns the normalized receipt.
    pub async fn mint(
        &self,
        recipient: &str,
        amount: &str,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(format!("{}/api/v1/mint", self.base_url))
            .json(&MintRequestBody { recipient, amount })
            .send()
            .await?;

        parse(resp).await
    }

    /// Token metadata, owner and pause state.
    pub async fn token_info(&self) -> Result<TokenInfoResponse, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/api/v1/token", self.base_url))
            .send()
            .await?;

        parse(resp).await
    }

    pub async fn balance(&self, address: &str) -> Result<BalanceResponse, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/api/v1/balance/{}", self.base_url, address))
            .send()
            .await?;

        parse(resp).await
    }

    /// Service health. `status` is "healthy" when the node answers.
    pub async fn health(&self) -> Result<HealthResponse, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK | StatusCode::SERVICE_UNAVAILABLE => Ok(resp.json().await?),
            status => Err(format!("Service returned unexpected status {}", status).into()),
        }
    }
}

async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, Box<dyn std::error::Error>> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(mut err) => {
                err.status = status.as_u16();
                Err(err.into())
            }
            Err(_) => Err(format!("Service returned error status {}: {}", status, text).into()),
        };
    }

    Ok(serde_json::from_str::<T>(&text)?)
}
