/// Error types for burnswap
///
/// `BurnSwapError` is the single error that crosses action boundaries. The
/// event layer never forwards its details to the presentation layer; a failed
/// action surfaces only as a null result.
use thiserror::Error;

// =============================================================================
// LEDGER RPC ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// WALLET CAPABILITY ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Broadcast failed: {0}")]
    Broadcast(#[from] RpcError),

    #[error("Signer proxy error: {0}")]
    Proxy(String),
}

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Error)]
pub enum BurnSwapError {
    #[error("Wallet not found: {name}")]
    CapabilityNotFound { name: String },

    #[error("Wallet {name} failed to connect: {reason}")]
    ConnectionFailure { name: String, reason: String },

    #[error("No metadata account for mint {mint}")]
    MetadataNotFound { mint: String },

    #[error("Quote failed: {0}")]
    QuoteFailure(String),

    #[error("Submission failed: {0}")]
    SubmissionFailure(String),

    #[error("RPC failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl BurnSwapError {
    /// Short category name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            BurnSwapError::CapabilityNotFound { .. } => "CapabilityNotFound",
            BurnSwapError::ConnectionFailure { .. } => "ConnectionFailure",
            BurnSwapError::MetadataNotFound { .. } => "MetadataNotFound",
            BurnSwapError::QuoteFailure(_) => "QuoteFailure",
            BurnSwapError::SubmissionFailure(_) => "SubmissionFailure",
            BurnSwapError::Rpc(_) => "Rpc",
            BurnSwapError::Config(_) => "Config",
            BurnSwapError::Data(_) => "Data",
            BurnSwapError::InvalidInput(_) => "InvalidInput",
        }
    }
}

impl From<WalletError> for BurnSwapError {
    fn from(err: WalletError) -> Self {
        BurnSwapError::SubmissionFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BurnSwapError>;
