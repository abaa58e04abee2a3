use anyhow::{anyhow, Context, Result};
use burnswap::{
    arguments,
    config::{self, Config},
    events::{Actions, Dispatcher, InboundEvent, Notification},
    logger::{self, LogTag},
    rpc::{Ledger, RpcClient},
    swaps::{self, SwapQuoteBuilder},
    tokens::{AccountScanner, MetadataResolver},
    transactions::TransactionAssembler,
    utils::short_address,
    wallets::{self, WalletCapability},
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Event bridge between the presentation layer and the burn/swap workflow
///
/// Inbound events arrive as JSON lines on stdin, notifications leave as JSON
/// lines on stdout. The bridge runs until stdin closes and every action it
/// started has reported back.
#[tokio::main]
async fn main() {
    if arguments::is_help_requested() {
        arguments::print_help();
        return;
    }

    if let Err(e) = run().await {
        logger::error(LogTag::System, &format!("❌ {:#}", e));
        logger::flush();
        std::process::exit(1);
    }

    logger::flush();
}

async fn run() -> Result<()> {
    let config_path = arguments::config_path();
    let config = config::load_config_from_path(&config_path)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    logger::init(config.logging.file_enabled, &config.logging.directory);
    logger::info(
        LogTag::System,
        &format!(
            "🚀 burnswap starting ({} wallets, {} remote signers, router {:?})",
            config.wallets.len(),
            config.remote_signers.len(),
            config.swap.router
        ),
    );

    let ledger: Arc<dyn Ledger> = Arc::new(RpcClient::new(&config.rpc.url, &config.rpc.commitment));
    let (dispatcher, notifications) = build_dispatcher(&config, ledger.clone())?;

    let writer = tokio::spawn(write_notifications(notifications));
    dispatcher.announce_wallets();

    let (registration_tx, registration_rx) = mpsc::channel::<Arc<dyn WalletCapability>>(16);
    for signer in wallets::remote_signers_from_config(&config, ledger.clone()) {
        let registration_tx = registration_tx.clone();
        tokio::spawn(async move {
            if signer.probe().await {
                let _ = registration_tx.send(signer).await;
            } else {
                logger::warning(
                    LogTag::Wallet,
                    &format!("Remote signer at {} is not reachable", signer.endpoint()),
                );
            }
        });
    }
    drop(registration_tx);

    let (event_tx, event_rx) = mpsc::channel::<InboundEvent>(64);
    let reader = tokio::spawn(read_events(event_tx));

    dispatcher.run(event_rx, registration_rx).await;

    reader.await.context("Input task failed")??;
    writer.await.context("Output task failed")??;

    logger::info(LogTag::System, "burnswap stopped");
    Ok(())
}

fn build_dispatcher(
    config: &Config,
    ledger: Arc<dyn Ledger>,
) -> Result<(Dispatcher, mpsc::UnboundedReceiver<Notification>)> {
    let oracle = swaps::oracle_from_config(config)?;
    logger::info(LogTag::Swap, &format!("Pricing oracle: {}", oracle.name()));

    let registry = wallets::registry_from_config(config, ledger.clone()).shared();
    let actions = Actions::new(
        registry,
        AccountScanner::new(ledger.clone()),
        MetadataResolver::new(ledger.clone(), config.metadata.clone()),
        TransactionAssembler::new(
            ledger,
            SwapQuoteBuilder::new(oracle, config.swap.slippage_bps),
        ),
    );

    let (notification_tx, notification_rx) = mpsc::unbounded_channel();
    Ok((Dispatcher::new(Arc::new(actions), notification_tx), notification_rx))
}

async fn read_events(events: mpsc::Sender<InboundEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<InboundEvent>(line) {
            Ok(event) => {
                if events.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => logger::warning(
                LogTag::Events,
                &format!("Ignoring malformed event '{}...': {}", short_address(line, 60), e),
            ),
        }
    }

    logger::debug(LogTag::Events, "stdin closed");
    Ok(())
}

async fn write_notifications(mut notifications: mpsc::UnboundedReceiver<Notification>) -> Result<()> {
    let mut stdout = tokio::io::stdout();

    while let Some(notification) = notifications.recv().await {
        let mut line = serde_json::to_string(&notification).context("Failed to encode notification")?;
        line.push('\n');
        stdout
            .write_all(line.as_bytes())
            .await
            .context("Failed to write stdout")?;
        stdout.flush().await.context("Failed to flush stdout")?;
    }

    Ok(())
}
