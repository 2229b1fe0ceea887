use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use super::address::Address;
use super::graph::AddressNode;
use super::graph::TransferEdge;
use super::transfer::StartTransfer;
use crate::constants::DEFAULT_MAX_HOPS;
use crate::constants::DEFAULT_PER_ADDRESS_LIMIT;
use crate::constants::MAX_MAX_HOPS;
use crate::constants::MAX_PER_ADDRESS_LIMIT;
use crate::constants::MIN_MAX_HOPS;
use crate::constants::MIN_PER_ADDRESS_LIMIT;
use crate::error::TraceError;

/// Which way the trace follows token flow from each frontier address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    /// Follow senders into the queried address
    Upstream,
    /// Follow recipients out of the queried address
    #[default]
    Downstream,
    Both,
}

impl TraceDirection {
    /// Whether a transfer seen while querying an address is kept in the graph.
    pub fn includes(
        self,
        is_in: bool,
        is_out: bool,
    ) -> bool {
        match self {
            TraceDirection::Both => true,
            TraceDirection::Downstream => is_out,
            TraceDirection::Upstream => is_in,
        }
    }

    pub fn follows_recipients(self) -> bool {
        matches!(self, TraceDirection::Downstream | TraceDirection::Both)
    }

    pub fn follows_senders(self) -> bool {
        matches!(self, TraceDirection::Upstream | TraceDirection::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TraceDirection::Upstream => "upstream",
            TraceDirection::Downstream => "downstream",
            TraceDirection::Both => "both",
        }
    }
}

impl fmt::Display for TraceDirection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraceDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upstream" => Ok(TraceDirection::Upstream),
            "downstream" => Ok(TraceDirection::Downstream),
            "both" => Ok(TraceDirection::Both),
            other => Err(format!("unknown trace direction: {}", other)),
        }
    }
}

/// Unvalidated caller input for a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRequest {
    pub wallet: String,
    pub token: String,
    pub direction: Option<String>,
    pub max_hops: Option<i64>,
    pub per_address_limit: Option<i64>,
}

impl TraceRequest {
    pub fn new(
        wallet: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            wallet: wallet.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_direction(
        mut self,
        direction: impl Into<String>,
    ) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub fn with_max_hops(
        mut self,
        max_hops: i64,
    ) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    pub fn with_per_address_limit(
        mut self,
        limit: i64,
    ) -> Self {
        self.per_address_limit = Some(limit);
        self
    }
}

/// Validated and clamped trace parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceParams {
    pub wallet: Address,
    pub token: Address,
    pub direction: TraceDirection,
    pub max_hops: u32,
    pub per_address_limit: u32,
}

impl TraceParams {
    pub fn from_request(request: &TraceRequest) -> Result<Self, TraceError> {
        let wallet = Address::parse(&request.wallet).map_err(|_| TraceError::InvalidWallet(request.wallet.clone()))?;
        let token = Address::parse(&request.token).map_err(|_| TraceError::InvalidToken(request.token.clone()))?;

        let direction = match request.direction.as_deref() {
            None => TraceDirection::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("trace_params::{}::falling_back_to::{}", e, TraceDirection::default());
                TraceDirection::default()
            }),
        };

        let max_hops = request
            .max_hops
            .map(|hops| hops.clamp(MIN_MAX_HOPS as i64, MAX_MAX_HOPS as i64) as u32)
            .unwrap_or(DEFAULT_MAX_HOPS);

        let per_address_limit = request
            .per_address_limit
            .map(|limit| limit.clamp(MIN_PER_ADDRESS_LIMIT as i64, MAX_PER_ADDRESS_LIMIT as i64) as u32)
            .unwrap_or(DEFAULT_PER_ADDRESS_LIMIT);

        Ok(Self {
            wallet,
            token,
            direction,
            max_hops,
            per_address_limit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<AddressNode>,
    pub edges: Vec<TransferEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub start_transfer_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceResult {
    pub wallet: Address,
    pub token: Address,
    pub direction: TraceDirection,
    pub max_hops: u32,
    pub per_address_limit: u32,
    pub graph: GraphSnapshot,
    pub summary: TraceSummary,
    pub start_transfers: Vec<StartTransfer>,
}
