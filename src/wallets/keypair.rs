/// Local keypair wallet
///
/// The secret is read from disk or configuration on `connect`, never earlier,
/// so a wallet listed in the configuration costs nothing until used.
use super::capability::{Readiness, WalletCapability};
use crate::config::KeypairWalletConfig;
use crate::errors::WalletError;
use crate::logger::{self, LogTag};
use crate::rpc::Ledger;
use crate::transactions::AssembledTransaction;
use async_trait::async_trait;
use parking_lot::RwLock;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum KeySource {
    File(PathBuf),
    Inline(String),
    Loaded,
}

pub struct KeypairWallet {
    name: String,
    icon: String,
    source: Option<KeySource>,
    keypair: RwLock<Option<Arc<Keypair>>>,
    preloaded: Option<Arc<Keypair>>,
    ledger: Arc<dyn Ledger>,
}

impl KeypairWallet {
    pub fn from_config(config: &KeypairWalletConfig, ledger: Arc<dyn Ledger>) -> Self {
        let source = match (&config.keypair_path, &config.private_key) {
            (Some(path), _) => Some(KeySource::File(PathBuf::from(path))),
            (None, Some(key)) => Some(KeySource::Inline(key.clone())),
            (None, None) => None,
        };

        Self {
            name: config.name.clone(),
            icon: config.icon.clone(),
            source,
            keypair: RwLock::new(None),
            preloaded: None,
            ledger,
        }
    }

    /// Wallet over an in-memory keypair
    pub fn with_keypair(name: &str, icon: &str, keypair: Keypair, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            source: Some(KeySource::Loaded),
            keypair: RwLock::new(None),
            preloaded: Some(Arc::new(keypair)),
            ledger,
        }
    }

    fn load(&self) -> Result<Arc<Keypair>, WalletError> {
        match &self.source {
            Some(KeySource::File(path)) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    WalletError::ConnectionRefused(format!(
                        "Cannot read keypair file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                parse_private_key(&contents).map(Arc::new)
            }
            Some(KeySource::Inline(raw)) => parse_private_key(raw).map(Arc::new),
            Some(KeySource::Loaded) => self
                .preloaded
                .clone()
                .ok_or_else(|| WalletError::ConnectionRefused("No keypair loaded".to_string())),
            None => Err(WalletError::ConnectionRefused(format!(
                "Wallet {} has no key source",
                self.name
            ))),
        }
    }

    fn connected_keypair(&self) -> Result<Arc<Keypair>, WalletError> {
        self.keypair.read().clone().ok_or(WalletError::NotConnected)
    }
}

/// Parses a secret key given as base58 or as a `[1,2,...]` byte array
pub fn parse_private_key(raw: &str) -> Result<Keypair, WalletError> {
    let raw = raw.trim();
    let bytes = if raw.starts_with('[') && raw.ends_with(']') {
        serde_json::from_str::<Vec<u8>>(raw).map_err(|_| {
            WalletError::ConnectionRefused("Invalid private key byte array".to_string())
        })?
    } else {
        bs58::decode(raw)
            .into_vec()
            .map_err(|_| WalletError::ConnectionRefused("Invalid base58 private key".to_string()))?
    };

    Keypair::try_from(&bytes[..])
        .map_err(|_| WalletError::ConnectionRefused("Invalid private key".to_string()))
}

#[async_trait]
impl WalletCapability for KeypairWallet {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &str {
        &self.icon
    }

    fn readiness(&self) -> Readiness {
        if self.source.is_some() {
            Readiness::Installed
        } else {
            Readiness::NotDetected
        }
    }

    async fn connect(&self) -> Result<Pubkey, WalletError> {
        let keypair = self.load()?;
        let pubkey = keypair.pubkey();
        *self.keypair.write() = Some(keypair);

        logger::info(
            LogTag::Wallet,
            &format!("Wallet {} connected as {}", self.name, pubkey),
        );
        Ok(pubkey)
    }

    fn disconnect(&self) {
        if self.keypair.write().take().is_some() {
            logger::info(LogTag::Wallet, &format!("Wallet {} disconnected", self.name));
        }
    }

    fn is_connected(&self) -> bool {
        self.keypair.read().is_some()
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.keypair.read().as_ref().map(|k| k.pubkey())
    }

    async fn sign_and_send(
        &self,
        transaction: AssembledTransaction,
    ) -> Result<Signature, WalletError> {
        let keypair = self.connected_keypair()?;
        if transaction.fee_payer != keypair.pubkey() {
            return Err(WalletError::Signing(format!(
                "Fee payer {} is not wallet {}",
                transaction.fee_payer,
                keypair.pubkey()
            )));
        }

        let signed = {
            let mut tx = transaction.to_transaction();
            let mut signers: Vec<&dyn Signer> = Vec::with_capacity(1 + transaction.signers.len());
            signers.push(keypair.as_ref());
            for aux in &transaction.signers {
                signers.push(aux);
            }
            tx.try_sign(&signers, transaction.recent_blockhash)
                .map_err(|e| WalletError::Signing(e.to_string()))?;
            tx
        };

        logger::debug(
            LogTag::Wallet,
            &format!(
                "Wallet {} signed transaction with {} signatures",
                self.name,
                signed.signatures.len()
            ),
        );

        Ok(self.ledger.send_transaction(&signed).await?)
    }
}
