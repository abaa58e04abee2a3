/// Global constants used across burnswap
///
/// The swap pair is fixed per deployment: native SOL in, BONK out, through the
/// Orca whirlpool with tick spacing 64.
use solana_sdk::{pubkey, pubkey::Pubkey};

// ============================================================================
// SOLANA BLOCKCHAIN CONSTANTS
// ============================================================================

/// SOL token mint address (wrapped SOL / WSOL)
pub const SOL_MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");

/// Lamports per SOL (10^9)
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

// ============================================================================
// TARGET TOKEN
// ============================================================================

/// BONK mint, the swap output
pub const TARGET_MINT: Pubkey = pubkey!("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263");

pub const TARGET_DECIMALS: u8 = 5;

pub const TARGET_SYMBOL: &str = "BONK";

// ============================================================================
// PROGRAMS
// ============================================================================

/// Metaplex token metadata program
pub const METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Seed prefix of metadata accounts
pub const METADATA_SEED: &[u8] = b"metadata";

/// Orca whirlpool program
pub const WHIRLPOOL_PROGRAM_ID: Pubkey = pubkey!("whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc");

/// Orca mainnet whirlpools config account
pub const WHIRLPOOLS_CONFIG: Pubkey = pubkey!("2LecshUwdy9xi7meFgHtFJQNSKk4KdTrcpvaB56dP2NQ");

pub const WHIRLPOOL_SEED: &[u8] = b"whirlpool";

/// Pool granularity of the SOL/BONK whirlpool
pub const TICK_SPACING: u16 = 64;
