pub mod etherscan;

use async_trait::async_trait;

pub use etherscan::EtherscanClient;

use crate::error::SourceError;
use crate::model::Address;
use crate::model::TokenTransfer;

/// Answer to a transfer-history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Most recent first, at most the requested limit
    Transfers(Vec<TokenTransfer>),
    /// The provider answered well-formed with nothing to report
    NoResults,
}

impl FetchOutcome {
    pub fn into_transfers(self) -> Vec<TokenTransfer> {
        match self {
            FetchOutcome::Transfers(transfers) => transfers,
            FetchOutcome::NoResults => Vec::new(),
        }
    }
}

/// The two explorer queries a trace depends on.
#[async_trait]
pub trait TransferSource: Send + Sync {
    /// Token transfers of `token` touching `address`, newest first, capped at `limit`.
    async fn fetch_transfers(
        &self,
        address: &Address,
        token: &Address,
        limit: u32,
    ) -> Result<FetchOutcome, SourceError>;

    /// Whether `address` has bytecode at the latest block.
    async fn is_contract(
        &self,
        address: &Address,
    ) -> Result<bool, SourceError>;
}
