use std::time::Duration;

use rand::Rng;

use crate::constants::MAX_TOKEN_DECIMALS;

/// True iff `value` is `0x` followed by exactly 40 hex digits, in any case.
pub fn is_address(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 42
        && bytes[0] == b'0'
        && (bytes[1] == b'x' || bytes[1] == b'X')
        && bytes[2..].iter().all(|b| b.is_ascii_hexdigit())
}

/// Lowercase canonical form of an address. Idempotent.
pub fn normalize(value: &str) -> String {
    value.to_ascii_lowercase()
}

/// Shift an unsigned integer string right by `decimals` places without going through floats.
///
/// `decimals` is clamped to 36. Leading zeros of the integer and trailing zeros of the
/// fraction are dropped, so `("1500000000000000000", 18)` renders as `1.5` and
/// `("1", 2)` as `0.01`. Input that is not a plain digit string is returned unchanged.
pub fn format_amount(
    raw: &str,
    decimals: u32,
) -> String {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }

    let decimals = decimals.min(MAX_TOKEN_DECIMALS) as usize;
    let stripped = raw.trim_start_matches('0');
    let stripped = if stripped.is_empty() { "0" } else { stripped };

    if decimals == 0 {
        return stripped.to_string();
    }

    let padded = if stripped.len() <= decimals {
        format!("{:0>width$}", stripped, width = decimals + 1)
    } else {
        stripped.to_string()
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Display label for an address: the first 6 and last 4 characters, `0x1234…abcd`.
/// Strings too short to truncate are returned unchanged.
pub fn short_address(value: &str) -> String {
    if value.len() <= 10 || !value.is_ascii() {
        return value.to_string();
    }
    format!("{}…{}", &value[..6], &value[value.len() - 4..])
}

/// Parse a provider decimals field, treating anything unparsable as zero decimals
pub fn parse_decimals(value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or(0).min(MAX_TOKEN_DECIMALS)
}

/// Calculate exponential backoff with jitter
pub fn calculate_backoff_with_jitter(
    attempt: usize,
    base_delay_ms: u64,
    max_delay_ms: u64,
) -> Duration {
    // delay = base * 2^attempt
    let exponential_delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt as u32));

    let capped_delay = exponential_delay.min(max_delay_ms);

    // ±25% jitter
    let jitter_range = capped_delay / 4;
    let mut rng = rand::rng();
    let jitter = rng.random_range(0..=jitter_range * 2);
    let final_delay = capped_delay.saturating_add(jitter).saturating_sub(jitter_range);

    Duration::from_millis(final_delay)
}

/// Check if an error message indicates a rate limit or timeout that should be retried
pub fn is_retryable_error(error_msg: &str) -> bool {
    let lowered = error_msg.to_ascii_lowercase();
    lowered.contains("429")
        || lowered.contains("rate limit")
        || lowered.contains("timed out")
        || lowered.contains("timeout")
        || lowered.contains("connection reset")
        || lowered.contains("connection refused")
        || lowered.contains("too many requests")
}
