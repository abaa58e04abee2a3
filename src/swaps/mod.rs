/// Swap quote builder
///
/// The pricing oracle is a black box behind `PricingOracle`: given an input
/// amount it returns executable swap instructions, the auxiliary signers they
/// need and the estimated output. Two oracles exist:
/// - `jupiter`: Jupiter swap-instructions API pinned to the Orca whirlpool (default)
/// - `orca`: Orca whirlpools SDK against the derived pool (feature `orca`)
pub mod config;
pub mod jupiter;
#[cfg(feature = "orca")]
pub mod orca;

pub use jupiter::JupiterOracle;
#[cfg(feature = "orca")]
pub use orca::OrcaOracle;

use crate::config::{Config, SwapRouter};
use crate::constants::{
    SOL_MINT, TARGET_DECIMALS, TARGET_MINT, TICK_SPACING, WHIRLPOOLS_CONFIG, WHIRLPOOL_PROGRAM_ID,
    WHIRLPOOL_SEED,
};
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use crate::utils::{format_estimate, lamports_to_sol};
use crate::wallets::WalletHandle;
use async_trait::async_trait;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair};
use std::fmt;
use std::sync::Arc;

/// Address of the whirlpool for a mint pair and tick spacing
pub fn whirlpool_address(mint_a: &Pubkey, mint_b: &Pubkey, tick_spacing: u16) -> Pubkey {
    Pubkey::find_program_address(
        &[
            WHIRLPOOL_SEED,
            WHIRLPOOLS_CONFIG.as_ref(),
            mint_a.as_ref(),
            mint_b.as_ref(),
            &tick_spacing.to_le_bytes(),
        ],
        &WHIRLPOOL_PROGRAM_ID,
    )
    .0
}

/// The SOL/BONK pool every swap goes through
pub fn target_pool() -> Pubkey {
    whirlpool_address(&SOL_MINT, &TARGET_MINT, TICK_SPACING)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub pool: Pubkey,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    /// Input in lamports
    pub amount: u64,
    pub slippage_bps: u16,
    /// Account that signs and pays for the swap
    pub user: Pubkey,
}

/// What the oracle hands back for one request
pub struct OracleQuote {
    pub instructions: Vec<Instruction>,
    pub additional_signers: Vec<Keypair>,
    /// Raw output amount in target token base units
    pub estimated_amount_out: u64,
}

#[async_trait]
pub trait PricingOracle: Send + Sync {
    fn name(&self) -> &str;

    async fn swap_instructions(&self, request: QuoteRequest) -> Result<OracleQuote, BurnSwapError>;
}

/// An executable swap, valid only for the transaction it is built into
pub struct SwapQuote {
    /// `~1,234,567` style estimate of the target token received
    pub estimate: String,
    pub amount_in: u64,
    pub estimated_amount_out: u64,
    pub instructions: Vec<Instruction>,
    pub signers: Vec<Keypair>,
}

impl fmt::Debug for SwapQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapQuote")
            .field("estimate", &self.estimate)
            .field("amount_in", &self.amount_in)
            .field("estimated_amount_out", &self.estimated_amount_out)
            .field("instructions", &self.instructions.len())
            .field("signers", &self.signers.len())
            .finish()
    }
}

#[derive(Clone)]
pub struct SwapQuoteBuilder {
    oracle: Arc<dyn PricingOracle>,
    slippage_bps: u16,
}

impl SwapQuoteBuilder {
    pub fn new(oracle: Arc<dyn PricingOracle>, slippage_bps: u16) -> Self {
        Self {
            oracle,
            slippage_bps,
        }
    }

    pub fn slippage_bps(&self) -> u16 {
        self.slippage_bps
    }

    /// Quotes swapping `amount` lamports into the target token for `wallet`
    pub async fn quote(
        &self,
        amount: u64,
        wallet: &WalletHandle,
    ) -> Result<(String, SwapQuote), BurnSwapError> {
        self.quote_for(amount, &wallet.public_key).await
    }

    /// Same as `quote` for a bare owner address, with no connected wallet
    pub async fn quote_for(
        &self,
        amount: u64,
        user: &Pubkey,
    ) -> Result<(String, SwapQuote), BurnSwapError> {
        if amount == 0 {
            return Err(BurnSwapError::QuoteFailure(
                "Nothing to swap: input amount is zero".to_string(),
            ));
        }

        let request = QuoteRequest {
            pool: target_pool(),
            input_mint: SOL_MINT,
            output_mint: TARGET_MINT,
            amount,
            slippage_bps: self.slippage_bps,
            user: *user,
        };

        logger::debug(
            LogTag::Swap,
            &format!(
                "Quoting {} SOL via {} (pool {}, slippage {} bps)",
                lamports_to_sol(amount),
                self.oracle.name(),
                request.pool,
                self.slippage_bps
            ),
        );

        let quote = self
            .oracle
            .swap_instructions(request)
            .await
            .map_err(|e| match e {
                BurnSwapError::QuoteFailure(_) => e,
                other => BurnSwapError::QuoteFailure(other.to_string()),
            })?;

        if quote.instructions.is_empty() {
            return Err(BurnSwapError::QuoteFailure(format!(
                "{} returned no swap instructions",
                self.oracle.name()
            )));
        }

        let estimate = format_estimate(quote.estimated_amount_out, TARGET_DECIMALS);
        logger::info(
            LogTag::Swap,
            &format!(
                "{} SOL → {} ({} instructions, {} extra signers)",
                lamports_to_sol(amount),
                estimate,
                quote.instructions.len(),
                quote.additional_signers.len()
            ),
        );

        Ok((
            estimate.clone(),
            SwapQuote {
                estimate,
                amount_in: amount,
                estimated_amount_out: quote.estimated_amount_out,
                instructions: quote.instructions,
                signers: quote.additional_signers,
            },
        ))
    }
}

/// Oracle selected by `swap.router`
pub fn oracle_from_config(config: &Config) -> Result<Arc<dyn PricingOracle>, BurnSwapError> {
    match config.swap.router {
        SwapRouter::Jupiter => Ok(Arc::new(JupiterOracle::new(&config.swap))),
        #[cfg(feature = "orca")]
        SwapRouter::Orca => Ok(Arc::new(OrcaOracle::new(&config.rpc.url))),
        #[cfg(not(feature = "orca"))]
        SwapRouter::Orca => Err(BurnSwapError::Config(
            "swap.router = \"orca\" requires building with the `orca` feature".to_string(),
        )),
    }
}
