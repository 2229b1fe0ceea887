/// ======================= Trace parameters =======================
pub const DEFAULT_MAX_HOPS: u32 = 2;
pub const MIN_MAX_HOPS: u32 = 1;
pub const MAX_MAX_HOPS: u32 = 4;

pub const DEFAULT_PER_ADDRESS_LIMIT: u32 = 50;
pub const MIN_PER_ADDRESS_LIMIT: u32 = 10;
pub const MAX_PER_ADDRESS_LIMIT: u32 = 200;

/// Addresses beyond this many newly discovered nodes are never classified
pub const CLASSIFY_LIMIT: usize = 25;

/// Start-address transfers kept in the report, newest first
pub const START_TRANSFER_LIMIT: usize = 100;

/// Upper bound on the decimals a token can declare for formatting purposes
pub const MAX_TOKEN_DECIMALS: u32 = 36;

/// ======================= Explorer =======================
/// Etherscan multichain endpoint
pub const ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";

pub const ETHERSCAN_API_KEY_ENV: &str = "ETHERSCAN_API_KEY";

pub const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

pub const START_LABEL_PREFIX: &str = "start · ";
