use crate::errors::WalletError;
use crate::transactions::AssembledTransaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::fmt;
use std::sync::Arc;

/// How usable a capability is right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Readiness {
    /// Usable immediately
    Installed,
    /// Usable after an out-of-process load step (mobile proxies)
    Loadable,
    NotDetected,
    Unsupported,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Readiness::Installed => "installed",
            Readiness::Loadable => "loadable",
            Readiness::NotDetected => "not detected",
            Readiness::Unsupported => "unsupported",
        };
        write!(f, "{}", label)
    }
}

/// A signer the user can connect and act through
///
/// Implementations hold their own connection state. `sign_and_send` must sign
/// with the connected key plus every auxiliary signer of the transaction, then
/// broadcast it; the signature is returned once the ledger accepts it.
#[async_trait]
pub trait WalletCapability: Send + Sync {
    fn name(&self) -> &str;

    fn icon(&self) -> &str;

    fn readiness(&self) -> Readiness;

    fn is_mobile_proxy(&self) -> bool {
        false
    }

    /// Activates the capability and returns its public identity
    async fn connect(&self) -> Result<Pubkey, WalletError>;

    fn disconnect(&self);

    fn is_connected(&self) -> bool;

    /// Public identity, None while disconnected
    fn public_key(&self) -> Option<Pubkey>;

    async fn sign_and_send(&self, transaction: AssembledTransaction)
        -> Result<Signature, WalletError>;
}

/// Whether a capability may be offered to the user
pub fn is_surfaced(capability: &dyn WalletCapability) -> bool {
    match capability.readiness() {
        Readiness::Installed => true,
        Readiness::Loadable => capability.is_mobile_proxy(),
        Readiness::NotDetected | Readiness::Unsupported => false,
    }
}

/// Discovery entry for one capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub name: String,
    pub icon: String,
    pub readiness: Readiness,
}

impl WalletInfo {
    pub fn of(capability: &dyn WalletCapability) -> Self {
        Self {
            name: capability.name().to_string(),
            icon: capability.icon().to_string(),
            readiness: capability.readiness(),
        }
    }
}

/// A connected capability together with the identity it reported
#[derive(Clone)]
pub struct WalletHandle {
    pub capability: Arc<dyn WalletCapability>,
    pub public_key: Pubkey,
}

impl WalletHandle {
    pub fn name(&self) -> &str {
        self.capability.name()
    }

    pub fn icon(&self) -> &str {
        self.capability.icon()
    }

    /// Connection state can change externally after the handle was created
    pub fn is_connected(&self) -> bool {
        self.capability.is_connected()
    }

    pub async fn sign_and_send(
        &self,
        transaction: AssembledTransaction,
    ) -> Result<Signature, WalletError> {
        if !self.is_connected() {
            return Err(WalletError::NotConnected);
        }
        self.capability.sign_and_send(transaction).await
    }
}

impl fmt::Debug for WalletHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletHandle")
            .field("name", &self.name())
            .field("public_key", &self.public_key)
            .finish()
    }
}
