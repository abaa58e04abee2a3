/// Small formatting and parsing helpers shared by the workflow modules
use crate::constants::LAMPORTS_PER_SOL;
use crate::errors::BurnSwapError;
use num_format::{Locale, ToFormattedString};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub fn lamports_to_sol(lamports: u64) -> f64 {
    (lamports as f64) / (LAMPORTS_PER_SOL as f64)
}

/// Parses a base58 address, naming the field in the error
pub fn parse_pubkey(address: &str, what: &str) -> Result<Pubkey, BurnSwapError> {
    Pubkey::from_str(address.trim())
        .map_err(|e| BurnSwapError::InvalidInput(format!("Invalid {} '{}': {}", what, address, e)))
}

/// First `len` characters of an address, for status lines and logs
pub fn short_address(address: &str, len: usize) -> &str {
    match address.char_indices().nth(len) {
        Some((idx, _)) => &address[..idx],
        None => address,
    }
}

/// Raw amount scaled down by `decimals`, rounded to the nearest unit and
/// rendered with thousands separators, prefixed with `~`
pub fn format_estimate(raw_amount: u64, decimals: u8) -> String {
    let divisor = 10u64.pow(decimals as u32);
    let rounded = ((raw_amount as u128 + (divisor as u128) / 2) / divisor as u128) as u64;
    format!("~{}", rounded.to_formatted_string(&Locale::en))
}

/// Whether a raw token amount string denotes zero
///
/// Accepts canonical and non-canonical zero spellings ("0", "000", "0.0").
/// Anything that is not a plain decimal number is treated as non-zero so it
/// is never closed by mistake.
pub fn is_zero_amount(amount: &str) -> bool {
    let amount = amount.trim();
    if amount.is_empty() {
        return false;
    }

    let mut seen_dot = false;
    let mut seen_digit = false;
    for ch in amount.chars() {
        match ch {
            '0' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}
