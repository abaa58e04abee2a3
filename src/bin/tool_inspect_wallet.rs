/// Wallet Inspection Tool
///
/// Read-only view of what the bridge would see for a wallet: its non-empty
/// token accounts, the empty ones a cleanup would close, the rent they hold
/// and optionally what that rent would swap into. Never signs or submits.
///
/// Usage:
///   cargo run --bin tool_inspect_wallet -- --help
///   cargo run --bin tool_inspect_wallet -- --wallet <ADDRESS>
///   cargo run --bin tool_inspect_wallet -- --keypair ~/.config/solana/id.json --estimate
use anyhow::{anyhow, bail, Context, Result};
use burnswap::{
    config,
    constants::TARGET_SYMBOL,
    logger::{self, LogTag},
    rpc::{Ledger, RpcClient},
    swaps::{self, SwapQuoteBuilder},
    tokens::AccountScanner,
    utils::{lamports_to_sol, parse_pubkey},
    wallets::parse_private_key,
};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use futures::future::try_join_all;
use solana_sdk::{pubkey::Pubkey, signer::Signer};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(about = "Inspect a wallet's token accounts and reclaimable rent")]
struct Args {
    /// Wallet address to inspect
    #[arg(short, long)]
    wallet: Option<String>,

    /// Keypair file whose public key is inspected (default: Solana CLI keypair)
    #[arg(short, long)]
    keypair: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, default_value = burnswap::arguments::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Also quote the swap of the reclaimable rent
    #[arg(short, long)]
    estimate: bool,
}

fn default_keypair_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("solana").join("id.json"))
}

fn resolve_wallet(args: &Args) -> Result<Pubkey> {
    if let Some(address) = &args.wallet {
        return Ok(parse_pubkey(address, "wallet")?);
    }

    let path = match &args.keypair {
        Some(path) => path.clone(),
        None => default_keypair_path().ok_or_else(|| anyhow!("No home directory, pass --wallet"))?,
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read keypair {}", path.display()))?;
    let keypair = parse_private_key(&contents)?;
    Ok(keypair.pubkey())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = config::load_config_from_path(&args.config).map_err(|e| anyhow!(e))?;
    logger::init(false, &config.logging.directory);

    let owner = resolve_wallet(&args)?;
    logger::info(LogTag::System, &format!("🔍 Inspecting {}", owner));

    let ledger: Arc<dyn Ledger> = Arc::new(RpcClient::new(&config.rpc.url, &config.rpc.commitment));
    let scanner = AccountScanner::new(ledger.clone());

    let owned = scanner.list_owned(&owner).await?;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Mint", "Token Account", "Amount", "Decimals"]);
    for record in &owned {
        table.add_row(vec![
            record.mint_id.clone(),
            record.token_acct.clone(),
            record.amount.clone(),
            record.decimals.to_string(),
        ]);
    }
    println!("\nOwned token accounts: {}", owned.len());
    println!("{}", table);

    let empty = scanner.list_empty(&owner).await?;
    let balances = try_join_all(empty.iter().map(|account| ledger.get_balance(&account.address))).await?;
    let reclaimable: u64 = balances.iter().sum();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Empty Token Account", "Program", "Rent (SOL)"]);
    for (account, lamports) in empty.iter().zip(&balances) {
        table.add_row(vec![
            account.address.to_string(),
            account.program_id.to_string(),
            format!("{:.9}", lamports_to_sol(*lamports)),
        ]);
    }
    println!("\nEmpty token accounts: {}", empty.len());
    println!("{}", table);
    println!("Reclaimable rent: {} SOL", lamports_to_sol(reclaimable));

    if args.estimate {
        if reclaimable == 0 {
            bail!("Nothing to reclaim, no estimate to compute");
        }

        let oracle = swaps::oracle_from_config(&config)?;
        let oracle_name = oracle.name().to_string();
        let builder = SwapQuoteBuilder::new(oracle, config.swap.slippage_bps);
        let (estimate, quote) = builder.quote_for(reclaimable, &owner).await?;
        println!(
            "Cleanup would receive {} {} via {} ({} instructions)",
            estimate,
            TARGET_SYMBOL,
            oracle_name,
            quote.instructions.len()
        );
    }

    logger::flush();
    Ok(())
}
