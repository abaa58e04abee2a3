/// Log tags identify the subsystem a line comes from
///
/// The debug key of a tag is what `--debug-<key>` and `--verbose-<key>` match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Rpc,
    Wallet,
    Tokens,
    Metadata,
    Swap,
    Transactions,
    Events,
    Other(String),
}

impl LogTag {
    /// Key used by --debug-<key> flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Rpc => "rpc".to_string(),
            LogTag::Wallet => "wallet".to_string(),
            LogTag::Tokens => "tokens".to_string(),
            LogTag::Metadata => "metadata".to_string(),
            LogTag::Swap => "swap".to_string(),
            LogTag::Transactions => "transactions".to_string(),
            LogTag::Events => "events".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label used in log files
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Rpc => "RPC".to_string(),
            LogTag::Wallet => "WALLET".to_string(),
            LogTag::Tokens => "TOKENS".to_string(),
            LogTag::Metadata => "METADATA".to_string(),
            LogTag::Swap => "SWAP".to_string(),
            LogTag::Transactions => "TX".to_string(),
            LogTag::Events => "EVENTS".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }
}
