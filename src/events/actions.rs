/// User actions
///
/// Each operation returns a typed result; turning it into a notification is
/// the dispatcher's job. Wallets are looked up by name on every call, so a
/// re-registered capability takes effect for the next action.
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use crate::tokens::{AccountScanner, MetadataResolver, TokenAccountRecord, TokenDescriptor};
use crate::transactions::{StatusSink, TransactionAssembler};
use crate::utils::parse_pubkey;
use crate::wallets::{
    connect_wallet, connected_handle, SharedRegistry, WalletCapability, WalletHandle, WalletInfo,
};
use solana_sdk::signature::Signature;
use std::sync::Arc;

pub struct Actions {
    registry: SharedRegistry,
    scanner: AccountScanner,
    resolver: MetadataResolver,
    assembler: TransactionAssembler,
}

impl Actions {
    pub fn new(
        registry: SharedRegistry,
        scanner: AccountScanner,
        resolver: MetadataResolver,
        assembler: TransactionAssembler,
    ) -> Self {
        Self {
            registry,
            scanner,
            resolver,
            assembler,
        }
    }

    fn capability(&self, name: &str) -> Result<Arc<dyn WalletCapability>, BurnSwapError> {
        self.registry.read().get(name)
    }

    fn handle(&self, name: &str) -> Result<WalletHandle, BurnSwapError> {
        connected_handle(self.capability(name)?)
    }

    /// Merges a capability that registered after startup
    pub fn register(&self, capability: Arc<dyn WalletCapability>) -> Option<WalletInfo> {
        self.registry.write().register(capability)
    }

    pub fn fetch_wallets(&self) -> Vec<WalletInfo> {
        self.registry.read().discover()
    }

    pub async fn connect(&self, name: &str) -> Result<WalletHandle, BurnSwapError> {
        let capability = self.capability(name)?;
        let handle = connect_wallet(capability).await?;
        logger::info(
            LogTag::Wallet,
            &format!("Connected {} as {}", name, handle.public_key),
        );
        Ok(handle)
    }

    pub async fn owned_tokens(
        &self,
        wallet: &WalletHandle,
    ) -> Result<Vec<TokenAccountRecord>, BurnSwapError> {
        self.scanner.list_owned(&wallet.public_key).await
    }

    pub async fn refresh_tokens(&self, name: &str) -> Result<Vec<TokenAccountRecord>, BurnSwapError> {
        let wallet = self.handle(name)?;
        self.owned_tokens(&wallet).await
    }

    pub async fn fetch_details(&self, mint_id: &str) -> Result<TokenDescriptor, BurnSwapError> {
        let mint = parse_pubkey(mint_id, "mint")?;
        self.resolver.resolve(&mint).await
    }

    /// Closes every empty account of the wallet; None when there was none
    pub async fn cleanup(
        &self,
        name: &str,
        sink: &dyn StatusSink,
    ) -> Result<Option<Signature>, BurnSwapError> {
        let wallet = self.handle(name)?;
        let empty = self.scanner.list_empty(&wallet.public_key).await?;
        self.assembler.assemble_cleanup(&wallet, &empty, sink).await
    }

    pub async fn burn(
        &self,
        name: &str,
        mint_id: &str,
        sink: &dyn StatusSink,
    ) -> Result<Signature, BurnSwapError> {
        let mint = parse_pubkey(mint_id, "mint")?;
        let wallet = self.handle(name)?;
        self.assembler.assemble_burn_and_swap(&wallet, &mint, sink).await
    }
}
