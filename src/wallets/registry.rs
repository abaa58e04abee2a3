use super::capability::{is_surfaced, WalletCapability, WalletHandle, WalletInfo};
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub type SharedRegistry = Arc<RwLock<WalletRegistry>>;

/// Name-keyed table of the capabilities the user may pick from
///
/// Mutated only by registration; actions read it to look a capability up.
/// Never hold the lock across an await point.
#[derive(Default)]
pub struct WalletRegistry {
    capabilities: HashMap<String, Arc<dyn WalletCapability>>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Merges a capability, replacing any earlier one with the same name
    ///
    /// Returns the discovery entry when the capability is surfaced. A
    /// capability that is not usable removes an earlier one of the same name.
    pub fn register(&mut self, capability: Arc<dyn WalletCapability>) -> Option<WalletInfo> {
        let name = capability.name().to_string();

        if !is_surfaced(capability.as_ref()) {
            logger::debug(
                LogTag::Wallet,
                &format!("Ignoring wallet {} ({})", name, capability.readiness()),
            );
            self.capabilities.remove(&name);
            return None;
        }

        let info = WalletInfo::of(capability.as_ref());
        if self.capabilities.insert(name.clone(), capability).is_some() {
            logger::debug(LogTag::Wallet, &format!("Wallet {} re-registered", name));
        } else {
            logger::info(LogTag::Wallet, &format!("Wallet {} registered", name));
        }
        Some(info)
    }

    /// Surfaced capabilities, sorted by name
    pub fn discover(&self) -> Vec<WalletInfo> {
        let mut wallets: Vec<WalletInfo> = self
            .capabilities
            .values()
            .map(|capability| WalletInfo::of(capability.as_ref()))
            .collect();
        wallets.sort_by(|a, b| a.name.cmp(&b.name));
        wallets
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn WalletCapability>, BurnSwapError> {
        self.capabilities
            .get(name)
            .cloned()
            .ok_or_else(|| BurnSwapError::CapabilityNotFound {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

/// Activates a capability and checks it reports connected afterwards
pub async fn connect_wallet(
    capability: Arc<dyn WalletCapability>,
) -> Result<WalletHandle, BurnSwapError> {
    let name = capability.name().to_string();

    let public_key = capability
        .connect()
        .await
        .map_err(|e| BurnSwapError::ConnectionFailure {
            name: name.clone(),
            reason: e.to_string(),
        })?;

    if !capability.is_connected() {
        return Err(BurnSwapError::ConnectionFailure {
            name,
            reason: "wallet reports not connected".to_string(),
        });
    }

    Ok(WalletHandle {
        capability,
        public_key,
    })
}

/// Handle for a capability the user connected earlier
pub fn connected_handle(
    capability: Arc<dyn WalletCapability>,
) -> Result<WalletHandle, BurnSwapError> {
    match capability.public_key() {
        Some(public_key) if capability.is_connected() => Ok(WalletHandle {
            capability,
            public_key,
        }),
        _ => Err(BurnSwapError::ConnectionFailure {
            name: capability.name().to_string(),
            reason: "wallet is not connected".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CapturingWallet;
    use crate::wallets::Readiness;

    #[test]
    fn registration_is_last_write_wins() {
        let mut registry = WalletRegistry::new();
        assert!(registry
            .register(Arc::new(CapturingWallet::new("Alpha").with_icon("a1.svg")))
            .is_some());
        assert!(registry
            .register(Arc::new(CapturingWallet::new("Alpha").with_icon("a2.svg")))
            .is_some());

        let wallets = registry.discover();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].icon, "a2.svg");
    }

    #[test]
    fn only_usable_capabilities_are_surfaced() {
        let mut registry = WalletRegistry::new();
        registry.register(Arc::new(CapturingWallet::new("Zeta")));
        registry.register(Arc::new(
            CapturingWallet::new("Hidden").with_readiness(Readiness::NotDetected),
        ));
        registry.register(Arc::new(
            CapturingWallet::new("Loader").with_readiness(Readiness::Loadable),
        ));
        registry.register(Arc::new(
            CapturingWallet::new("Mobile")
                .with_readiness(Readiness::Loadable)
                .as_mobile_proxy(),
        ));

        let names: Vec<String> = registry.discover().into_iter().map(|w| w.name).collect();
        assert_eq!(names, vec!["Mobile".to_string(), "Zeta".to_string()]);
        assert!(matches!(
            registry.get("Hidden"),
            Err(BurnSwapError::CapabilityNotFound { .. })
        ));
    }

    #[test]
    fn unusable_reregistration_removes_capability() {
        let mut registry = WalletRegistry::new();
        registry.register(Arc::new(CapturingWallet::new("Alpha")));
        assert!(registry
            .register(Arc::new(
                CapturingWallet::new("Alpha").with_readiness(Readiness::Unsupported)
            ))
            .is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn connect_reports_failures() {
        let refused = Arc::new(CapturingWallet::new("Refuses").refusing_connect());
        assert!(matches!(
            connect_wallet(refused).await,
            Err(BurnSwapError::ConnectionFailure { .. })
        ));

        let silent = Arc::new(CapturingWallet::new("Silent").staying_disconnected());
        assert!(matches!(
            connect_wallet(silent).await,
            Err(BurnSwapError::ConnectionFailure { .. })
        ));

        let wallet = Arc::new(CapturingWallet::new("Fine"));
        let handle = connect_wallet(wallet.clone()).await.unwrap();
        assert_eq!(handle.public_key, wallet.owner_pubkey());
        assert!(connected_handle(wallet.clone()).is_ok());

        wallet.disconnect();
        assert!(connected_handle(wallet).is_err());
    }
}
