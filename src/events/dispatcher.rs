/// Event dispatcher
///
/// Every inbound event runs as an independent task. A task ends with exactly
/// one notification on its result port: the payload on success, null on
/// failure. The failure itself is logged here and nowhere else; its detail
/// never reaches the presentation layer.
use super::actions::Actions;
use super::{InboundEvent, Notification, WalletUpdate};
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use crate::transactions::StatusSink;
use crate::wallets::WalletCapability;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

/// Queues a notification; false once the receiving side is gone
fn forward(notifications: &mpsc::UnboundedSender<Notification>, notification: Notification) -> bool {
    if notifications.send(notification).is_err() {
        logger::warning(LogTag::Events, "Notification receiver dropped");
        return false;
    }
    true
}

/// Forwards status texts as `statusUpdate` notifications
pub struct ChannelStatus {
    notifications: mpsc::UnboundedSender<Notification>,
}

impl ChannelStatus {
    pub fn new(notifications: mpsc::UnboundedSender<Notification>) -> Self {
        Self { notifications }
    }
}

impl StatusSink for ChannelStatus {
    fn status(&self, text: String) {
        logger::verbose(LogTag::Events, &format!("status: {}", text));
        forward(&self.notifications, Notification::StatusUpdate(text));
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    actions: Arc<Actions>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl Dispatcher {
    pub fn new(actions: Arc<Actions>, notifications: mpsc::UnboundedSender<Notification>) -> Self {
        Self {
            actions,
            notifications,
        }
    }

    fn emit(&self, notification: Notification) {
        forward(&self.notifications, notification);
    }

    /// Logs a failed action once and drops its detail
    fn settle<T>(&self, port: &str, result: Result<T, BurnSwapError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                logger::error(
                    LogTag::Events,
                    &format!("{} failed ({}): {}", port, e.kind(), e),
                );
                None
            }
        }
    }

    /// Emits a `walletUpdate` for every wallet currently offered
    pub fn announce_wallets(&self) {
        for info in self.actions.fetch_wallets() {
            self.emit(Notification::WalletUpdate(info.into()));
        }
    }

    /// Merges a late registration; surfaced wallets are announced
    pub fn register(&self, capability: Arc<dyn WalletCapability>) {
        if let Some(info) = self.actions.register(capability) {
            self.emit(Notification::WalletUpdate(WalletUpdate::from(info)));
        }
    }

    /// Runs `event` on its own task
    pub fn dispatch(&self, event: InboundEvent) -> JoinHandle<()> {
        tokio::spawn(self.clone().handle(event))
    }

    pub async fn handle(self, event: InboundEvent) {
        logger::debug(LogTag::Events, &format!("→ {}", event.port()));

        match event {
            InboundEvent::Connect(name) => {
                let connected = self.actions.connect(&name).await;
                let Some(wallet) = self.settle("connect", connected) else {
                    self.emit(Notification::ConnectCb(None));
                    return;
                };
                self.emit(Notification::ConnectCb(Some(wallet.public_key.to_string())));

                let owned = self.actions.owned_tokens(&wallet).await;
                self.emit(Notification::NftsCb(self.settle("connect", owned)));
            }
            InboundEvent::RefreshTokens { wallet_name } => {
                let owned = self.actions.refresh_tokens(&wallet_name).await;
                self.emit(Notification::NftsCb(self.settle("refreshTokens", owned)));
            }
            InboundEvent::FetchDetails { mint_id } => {
                let details = self.actions.fetch_details(&mint_id).await;
                self.emit(Notification::FetchDetailsCb(self.settle("fetchDetails", details)));
            }
            InboundEvent::Cleanup { wallet_name } => {
                let sink = ChannelStatus::new(self.notifications.clone());
                let result = self.actions.cleanup(&wallet_name, &sink).await;
                let signature = self.settle("cleanup", result).flatten();
                self.emit(Notification::CleanupCb(signature.map(|s| s.to_string())));
            }
            InboundEvent::Burn {
                wallet_name,
                mint_id,
            } => {
                let sink = ChannelStatus::new(self.notifications.clone());
                let result = self.actions.burn(&wallet_name, &mint_id, &sink).await;
                let signature = self.settle("burn", result);
                self.emit(Notification::BurnCb(signature.map(|s| s.to_string())));
            }
            InboundEvent::FetchWallets => self.announce_wallets(),
        }
    }

    /// Dispatches events until the inbound stream ends, merging registrations
    /// as they arrive, then waits for the tasks still in flight
    pub async fn run(
        self,
        mut events: mpsc::Receiver<InboundEvent>,
        mut registrations: mpsc::Receiver<Arc<dyn WalletCapability>>,
    ) {
        let mut tasks = JoinSet::new();
        let mut registrations_open = true;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        tasks.spawn(self.clone().handle(event));
                    }
                    None => break,
                },
                capability = registrations.recv(), if registrations_open => match capability {
                    Some(capability) => self.register(capability),
                    None => registrations_open = false,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        logger::error(LogTag::Events, &format!("Action task aborted: {}", e));
                    }
                }
            }
        }

        logger::debug(
            LogTag::Events,
            &format!("Inbound stream closed, {} actions in flight", tasks.len()),
        );
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                logger::error(LogTag::Events, &format!("Action task aborted: {}", e));
            }
        }
    }
}
