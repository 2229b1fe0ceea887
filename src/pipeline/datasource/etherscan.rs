use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use tracing::warn;
use url::Url;

use super::FetchOutcome;
use super::TransferSource;
use crate::config::ExplorerConfig;
use crate::constants::NO_TRANSACTIONS_MESSAGE;
use crate::error::SourceError;
use crate::model::Address;
use crate::model::TokenTransfer;
use crate::utils::calculate_backoff_with_jitter;

#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// Etherscan-compatible explorer client (v2 multichain API).
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    client: reqwest::Client,
    base_url: Url,
    config: ExplorerConfig,
}

impl EtherscanClient {
    pub fn new(config: ExplorerConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = reqwest::Client::builder().timeout(Duration::from_millis(config.timeout_ms)).build()?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn request_url(
        &self,
        params: &[(&str, &str)],
    ) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("chainid", &self.config.chain_id.to_string());
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(api_key) = &self.config.api_key {
                query.append_pair("apikey", api_key);
            }
        }
        url
    }

    async fn get_json(
        &self,
        url: Url,
    ) -> Result<Value, SourceError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Malformed(e.to_string()))
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &str,
        address: &Address,
        mut attempt_once: F,
    ) -> Result<T, SourceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match attempt_once().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                    let backoff_delay = calculate_backoff_with_jitter(
                        attempt,
                        self.config.base_retry_delay_ms,
                        self.config.max_retry_delay_ms,
                    );

                    debug!(
                        "retrying_after_backoff::{}::attempt::{}::delay_ms::{}::address::{}::error::{}",
                        operation,
                        attempt + 1,
                        backoff_delay.as_millis(),
                        address,
                        e
                    );

                    tokio::time::sleep(backoff_delay).await;
                    attempt += 1;
                },
                Err(e) => {
                    if attempt > 0 {
                        warn!("all_retries_failed::{}::address::{}::attempts::{}", operation, address, attempt + 1);
                    }
                    return Err(e);
                },
            }
        }
    }
}

#[async_trait]
impl TransferSource for EtherscanClient {
    async fn fetch_transfers(
        &self,
        address: &Address,
        token: &Address,
        limit: u32,
    ) -> Result<FetchOutcome, SourceError> {
        let limit = limit.to_string();
        let url = self.request_url(&[
            ("module", "account"),
            ("action", "tokentx"),
            ("contractaddress", token.as_str()),
            ("address", address.as_str()),
            ("page", "1"),
            ("offset", &limit),
            ("sort", "desc"),
        ]);

        debug!("fetching_transfers::address::{}::token::{}::limit::{}", address, token, limit);

        self.with_retry("fetch_transfers", address, || {
            let url = url.clone();
            async move { interpret_transfers(self.get_json(url).await?) }
        })
        .await
    }

    async fn is_contract(
        &self,
        address: &Address,
    ) -> Result<bool, SourceError> {
        let url = self.request_url(&[
            ("module", "proxy"),
            ("action", "eth_getCode"),
            ("address", address.as_str()),
            ("tag", "latest"),
        ]);

        debug!("fetching_code::address::{}", address);

        self.with_retry("is_contract", address, || {
            let url = url.clone();
            async move { interpret_code(self.get_json(url).await?) }
        })
        .await
    }
}

/// Map a `tokentx` response body to transfers, an explicit no-results answer, or an error.
pub(crate) fn interpret_transfers(body: Value) -> Result<FetchOutcome, SourceError> {
    let envelope: ExplorerEnvelope = serde_json::from_value(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

    let empty_result = envelope.result.as_array().is_some_and(|items| items.is_empty());

    match envelope.status.as_str() {
        "1" => {
            let transfers: Vec<TokenTransfer> =
                serde_json::from_value(envelope.result).map_err(|e| SourceError::Malformed(e.to_string()))?;
            if transfers.is_empty() {
                Ok(FetchOutcome::NoResults)
            } else {
                Ok(FetchOutcome::Transfers(transfers))
            }
        },
        "0" if envelope.message.starts_with(NO_TRANSACTIONS_MESSAGE) || empty_result => Ok(FetchOutcome::NoResults),
        "0" => Err(SourceError::Provider {
            message: envelope.message,
            detail: value_to_detail(&envelope.result),
        }),
        other => Err(SourceError::Malformed(format!("unexpected status {:?}", other))),
    }
}

/// Map an `eth_getCode` response body to whether bytecode is present.
pub(crate) fn interpret_code(body: Value) -> Result<bool, SourceError> {
    if let Some(error) = body.get("error") {
        let message = error.get("message").and_then(Value::as_str).unwrap_or("rpc error").to_string();
        return Err(SourceError::Provider {
            message,
            detail: error.to_string(),
        });
    }

    match body.get("result") {
        Some(Value::String(code)) if is_hex_payload(code) => Ok(code.len() > 2),
        Some(other) => Err(SourceError::Provider {
            message: body.get("message").and_then(Value::as_str).unwrap_or("unexpected result").to_string(),
            detail: value_to_detail(other),
        }),
        None => Err(SourceError::Malformed("missing result field".to_string())),
    }
}

fn is_hex_payload(code: &str) -> bool {
    code.strip_prefix("0x").is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn value_to_detail(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
