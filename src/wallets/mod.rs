/// Wallet capability provider
///
/// - `capability`: the `WalletCapability` trait, readiness and handles
/// - `keypair`: local keypair wallets from configuration
/// - `remote`: HTTP signing proxies (mobile style, registered asynchronously)
/// - `registry`: the name-keyed capability table handed to every action
pub mod capability;
pub mod keypair;
pub mod registry;
pub mod remote;

pub use capability::{is_surfaced, Readiness, WalletCapability, WalletHandle, WalletInfo};
pub use keypair::{parse_private_key, KeypairWallet};
pub use registry::{connect_wallet, connected_handle, SharedRegistry, WalletRegistry};
pub use remote::RemoteSignerWallet;

use crate::config::Config;
use crate::rpc::Ledger;
use std::sync::Arc;

/// Registry holding the configured keypair wallets
///
/// Remote signers are not included: they register once their probe succeeds.
pub fn registry_from_config(config: &Config, ledger: Arc<dyn Ledger>) -> WalletRegistry {
    let mut registry = WalletRegistry::new();
    for wallet in &config.wallets {
        registry.register(Arc::new(KeypairWallet::from_config(wallet, ledger.clone())));
    }
    registry
}

pub fn remote_signers_from_config(
    config: &Config,
    ledger: Arc<dyn Ledger>,
) -> Vec<Arc<RemoteSignerWallet>> {
    config
        .remote_signers
        .iter()
        .map(|signer| Arc::new(RemoteSignerWallet::from_config(signer, ledger.clone())))
        .collect()
}
