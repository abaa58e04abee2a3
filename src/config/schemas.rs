/// Configuration schemas - all config structures defined once with defaults
///
/// Each section maps to a TOML table of `data/config.toml`. Wallet entries are
/// arrays of tables (`[[wallets]]`, `[[remote_signers]]`).
use crate::config_struct;
use serde::{Deserialize, Serialize};

// ============================================================================
// RPC CONFIGURATION
// ============================================================================

config_struct! {
    /// Ledger RPC endpoint
    pub struct RpcConfig {
        url: String = "https://api.mainnet-beta.solana.com".to_string(),
        /// processed | confirmed | finalized
        commitment: String = "confirmed".to_string(),
    }
}

// ============================================================================
// SWAP CONFIGURATION
// ============================================================================

/// Which pricing oracle builds the swap instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapRouter {
    Jupiter,
    Orca,
}

config_struct! {
    /// Swap quoting configuration
    pub struct SwapConfig {
        router: SwapRouter = SwapRouter::Jupiter,
        /// 100 bps = 1%
        slippage_bps: u16 = 100,
        jupiter_quote_api: String = "https://lite-api.jup.ag/swap/v1/quote".to_string(),
        jupiter_swap_instructions_api: String =
            "https://lite-api.jup.ag/swap/v1/swap-instructions".to_string(),
    }
}

// ============================================================================
// METADATA CONFIGURATION
// ============================================================================

config_struct! {
    /// Token descriptor resolution
    pub struct MetadataConfig {
        /// Image shown when the off-chain document cannot be fetched
        placeholder_image: String = "/what.png".to_string(),
        /// Count recent burns of the mint into the descriptor rating
        compute_burn_rating: bool = false,
        burn_rating_signature_limit: usize = 25,
    }
}

// ============================================================================
// LOGGING CONFIGURATION
// ============================================================================

config_struct! {
    pub struct LoggingConfig {
        file_enabled: bool = true,
        directory: String = "logs".to_string(),
    }
}

// ============================================================================
// WALLET CAPABILITIES
// ============================================================================

/// A locally held keypair exposed as a wallet capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeypairWalletConfig {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// JSON byte-array keypair file (solana-keygen format)
    #[serde(default)]
    pub keypair_path: Option<String>,
    /// Base58 or `[1,2,...]` encoded secret key
    #[serde(default)]
    pub private_key: Option<String>,
}

/// An HTTP signing proxy exposed as a wallet capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSignerConfig {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub endpoint: String,
}

// ============================================================================
// ROOT
// ============================================================================

config_struct! {
    /// Root configuration
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        swap: SwapConfig = SwapConfig::default(),
        metadata: MetadataConfig = MetadataConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
        wallets: Vec<KeypairWalletConfig> = Vec::new(),
        remote_signers: Vec<RemoteSignerConfig> = Vec::new(),
    }
}
