/// Presentation bridge
///
/// Inbound events and outbound notifications use the port names and payload
/// shapes the presentation layer already speaks, serialized as
/// `{"port": <name>, "payload": <payload>}`. A failed action surfaces only as
/// a null payload on its result port.
///
/// - `actions`: typed async operations, one per inbound event
/// - `dispatcher`: runs each event as its own task and turns results into notifications
pub mod actions;
pub mod dispatcher;


pub use actions::Actions;
pub use dispatcher::{ChannelStatus, Dispatcher};

use crate::tokens::{TokenAccountRecord, TokenDescriptor};
use crate::wallets::WalletInfo;
use serde::{Deserialize, Serialize};

// =============================================================================
// INBOUND
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum InboundEvent {
    /// Wallet name
    Connect(String),
    #[serde(rename_all = "camelCase")]
    RefreshTokens { wallet_name: String },
    #[serde(rename_all = "camelCase")]
    FetchDetails { mint_id: String },
    #[serde(rename_all = "camelCase")]
    Cleanup { wallet_name: String },
    #[serde(rename_all = "camelCase")]
    Burn { wallet_name: String, mint_id: String },
    FetchWallets,
}

impl InboundEvent {
    pub fn port(&self) -> &'static str {
        match self {
            InboundEvent::Connect(_) => "connect",
            InboundEvent::RefreshTokens { .. } => "refreshTokens",
            InboundEvent::FetchDetails { .. } => "fetchDetails",
            InboundEvent::Cleanup { .. } => "cleanup",
            InboundEvent::Burn { .. } => "burn",
            InboundEvent::FetchWallets => "fetchWallets",
        }
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

/// Entry of the wallet picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletUpdate {
    pub name: String,
    pub icon: String,
}

impl From<WalletInfo> for WalletUpdate {
    fn from(info: WalletInfo) -> Self {
        Self {
            name: info.name,
            icon: info.icon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum Notification {
    WalletUpdate(WalletUpdate),
    /// Public key of the connected wallet
    ConnectCb(Option<String>),
    NftsCb(Option<Vec<TokenAccountRecord>>),
    FetchDetailsCb(Option<TokenDescriptor>),
    StatusUpdate(String),
    /// Transaction signature
    BurnCb(Option<String>),
    /// Transaction signature; null also when there was nothing to clean up
    CleanupCb(Option<String>),
}
