#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;

use athar::error::SourceError;
use athar::model::Address;
use athar::model::TokenTransfer;
use athar::pipeline::datasource::FetchOutcome;
use athar::pipeline::datasource::TransferSource;

pub const TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

/// Deterministic address from a small number
pub fn addr(n: u32) -> Address {
    Address::parse(&format!("0x{:040x}", n)).unwrap()
}

pub fn token() -> Address {
    Address::parse(TOKEN).unwrap()
}

/// A one-token (18 decimals) transfer with no symbol
pub fn transfer(
    from: &Address,
    to: &Address,
    hash: &str,
    timestamp: i64,
) -> TokenTransfer {
    TokenTransfer {
        hash: hash.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        value: "1000000000000000000".to_string(),
        token_decimal: "18".to_string(),
        time_stamp: timestamp.to_string(),
        transaction_index: "0".to_string(),
        contract_address: token().to_string(),
        ..Default::default()
    }
}

#[derive(Debug, Clone)]
enum Script {
    Transfers(Vec<TokenTransfer>),
    Fail(u16),
}

/// In-memory explorer: answers from scripted transfer lists, records every call.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    scripts: HashMap<Address, Script>,
    contracts: HashSet<Address>,
    classify_failures: HashSet<Address>,
    delay: Option<Duration>,
    fetch_calls: Mutex<Vec<Address>>,
    code_calls: Mutex<Vec<Address>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transfers(
        mut self,
        address: &Address,
        transfers: Vec<TokenTransfer>,
    ) -> Self {
        self.scripts.insert(address.clone(), Script::Transfers(transfers));
        self
    }

    /// Every transfer in `ledger` touching an address becomes that address' history,
    /// newest first, the way the explorer would report it.
    pub fn from_ledger(ledger: &[TokenTransfer]) -> Self {
        let mut histories: HashMap<Address, Vec<TokenTransfer>> = HashMap::new();
        for transfer in ledger {
            let from = Address::parse(&transfer.from).unwrap();
            let to = Address::parse(&transfer.to).unwrap();
            histories.entry(from.clone()).or_default().push(transfer.clone());
            if to != from {
                histories.entry(to).or_default().push(transfer.clone());
            }
        }

        let mut source = Self::new();
        for (address, mut history) in histories {
            history.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
            source = source.with_transfers(&address, history);
        }
        source
    }

    pub fn with_failure(
        mut self,
        address: &Address,
        status: u16,
    ) -> Self {
        self.scripts.insert(address.clone(), Script::Fail(status));
        self
    }

    pub fn with_contract(
        mut self,
        address: &Address,
    ) -> Self {
        self.contracts.insert(address.clone());
        self
    }

    pub fn with_classify_failure(
        mut self,
        address: &Address,
    ) -> Self {
        self.classify_failures.insert(address.clone());
        self
    }

    pub fn with_delay(
        mut self,
        delay: Duration,
    ) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_calls(&self) -> Vec<Address> {
        self.fetch_calls.lock().unwrap().clone()
    }

    pub fn code_calls(&self) -> Vec<Address> {
        self.code_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransferSource for ScriptedSource {
    async fn fetch_transfers(
        &self,
        address: &Address,
        _token: &Address,
        limit: u32,
    ) -> Result<FetchOutcome, SourceError> {
        self.fetch_calls.lock().unwrap().push(address.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.scripts.get(address) {
            Some(Script::Transfers(transfers)) if !transfers.is_empty() => {
                Ok(FetchOutcome::Transfers(transfers.iter().take(limit as usize).cloned().collect()))
            },
            Some(Script::Fail(status)) => Err(SourceError::Status(*status)),
            _ => Ok(FetchOutcome::NoResults),
        }
    }

    async fn is_contract(
        &self,
        address: &Address,
    ) -> Result<bool, SourceError> {
        self.code_calls.lock().unwrap().push(address.clone());

        if self.classify_failures.contains(address) {
            return Err(SourceError::Provider {
                message: "NOTOK".to_string(),
                detail: "Max rate limit reached".to_string(),
            });
        }
        Ok(self.contracts.contains(address))
    }
}
