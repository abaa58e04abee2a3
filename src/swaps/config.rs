/// Swap router configuration - hardcoded parameters
///
/// Endpoint URLs and slippage come from `SwapConfig`; the venue restrictions
/// below are fixed for the one pair this crate trades.

// =============================================================================
// COMMON CONFIGURATION
// =============================================================================

/// Swap direction: exact input amount, output is estimated
pub const DEFAULT_SWAP_MODE: &str = "ExactIn";

// =============================================================================
// JUPITER ROUTER CONFIGURATION
// =============================================================================

/// Restrict Jupiter routing to Orca whirlpools
pub const JUPITER_DEXES: &str = "Whirlpool";

/// Single-hop routes only, so the swap stays inside the SOL/BONK pool
pub const JUPITER_ONLY_DIRECT_ROUTES: bool = true;

/// Legacy transactions cannot reference address lookup tables
pub const JUPITER_AS_LEGACY_TRANSACTION: bool = true;

/// Let Jupiter wrap the reclaimed lamports into WSOL and unwrap leftovers
pub const JUPITER_WRAP_AND_UNWRAP_SOL: bool = true;

// =============================================================================
// ORCA ROUTER CONFIGURATION
// =============================================================================

/// Native SOL is wrapped through a fresh keypair account, which becomes an
/// auxiliary signer of the transaction
#[cfg(feature = "orca")]
pub const ORCA_WRAP_WITH_KEYPAIR: bool = true;
