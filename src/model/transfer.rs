use serde::Deserialize;
use serde::Serialize;

use crate::utils::format_amount;
use crate::utils::parse_decimals;

/// One token transfer event as returned by the explorer's `tokentx` action.
///
/// Fields are kept as the provider's raw strings; nothing here is normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenTransfer {
    pub block_number: String,
    pub time_stamp: String,
    pub hash: String,
    pub nonce: String,
    pub block_hash: String,
    pub from: String,
    pub contract_address: String,
    pub to: String,
    pub value: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimal: String,
    pub transaction_index: String,
    pub gas: String,
    pub gas_price: String,
    pub gas_used: String,
    pub cumulative_gas_used: String,
    pub input: String,
    pub confirmations: String,
}

impl TokenTransfer {
    /// Seconds since epoch, zero when the provider sent something unparsable
    pub fn timestamp(&self) -> i64 {
        self.time_stamp.trim().parse().unwrap_or(0)
    }

    pub fn decimals(&self) -> u32 {
        parse_decimals(&self.token_decimal)
    }

    /// `"<formatted amount> <symbol>"`, e.g. `"1.5 USDC"`
    pub fn amount_label(&self) -> String {
        format!("{} {}", format_amount(&self.value, self.decimals()), self.token_symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    In,
    Out,
}

/// A transfer touching the start address, kept for the report alongside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTransfer {
    #[serde(flatten)]
    pub transfer: TokenTransfer,
    pub direction: TransferDirection,
    pub amount_formatted: String,
}

impl StartTransfer {
    pub fn new(
        transfer: TokenTransfer,
        direction: TransferDirection,
    ) -> Self {
        let amount_formatted = transfer.amount_label();
        Self {
            transfer,
            direction,
            amount_formatted,
        }
    }
}
