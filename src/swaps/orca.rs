/// Orca whirlpools router
///
/// Builds the swap directly against the derived SOL/BONK whirlpool with the
/// Orca SDK. Native SOL is wrapped through a temporary keypair account whose
/// key is forwarded as an auxiliary signer.
use super::config::ORCA_WRAP_WITH_KEYPAIR;
use super::{OracleQuote, PricingOracle, QuoteRequest};
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use orca_whirlpools::{
    set_native_mint_wrapping_strategy, set_whirlpools_config_address,
    swap_instructions, NativeMintWrappingStrategy, SwapInstructions, SwapQuote, SwapType,
    WhirlpoolsConfigInput,
};
use solana_client::nonblocking::rpc_client::RpcClient;

pub struct OrcaOracle {
    rpc: RpcClient,
}

impl OrcaOracle {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            rpc: RpcClient::new(rpc_url.to_string()),
        }
    }
}

fn orca_error(context: &str, err: impl std::fmt::Display) -> BurnSwapError {
    BurnSwapError::QuoteFailure(format!("{}: {}", context, err))
}

static ORCA_CONFIGURED: OnceCell<()> = OnceCell::new();

/// Applies the process-wide SDK settings once. They are constants, so every
/// request sees the same values. The payer is passed per call as the signer
/// and never stored globally.
fn configure_orca() -> Result<(), BurnSwapError> {
    ORCA_CONFIGURED
        .get_or_try_init(|| {
            set_whirlpools_config_address(WhirlpoolsConfigInput::SolanaMainnet)
                .map_err(|e| orca_error("Whirlpools config", e))?;

            let strategy = if ORCA_WRAP_WITH_KEYPAIR {
                NativeMintWrappingStrategy::Keypair
            } else {
                NativeMintWrappingStrategy::Ata
            };
            set_native_mint_wrapping_strategy(strategy)
                .map_err(|e| orca_error("Wrapping strategy", e))
        })
        .map(|_| ())
}

fn estimated_out(quote: &SwapQuote) -> Result<u64, BurnSwapError> {
    match quote {
        SwapQuote::ExactIn(q) => Ok(q.token_est_out),
        _ => Err(BurnSwapError::QuoteFailure(
            "Expected an exact-input quote".to_string(),
        )),
    }
}

#[async_trait]
impl PricingOracle for OrcaOracle {
    fn name(&self) -> &str {
        "orca"
    }

    async fn swap_instructions(&self, request: QuoteRequest) -> Result<OracleQuote, BurnSwapError> {
        configure_orca()?;

        let result = swap_instructions(
            &self.rpc,
            request.pool,
            request.amount,
            request.input_mint,
            SwapType::ExactIn,
            Some(request.slippage_bps),
            Some(request.user),
        )
        .await
        .map_err(|e| orca_error("Orca swap_instructions failed", e));

        let SwapInstructions {
            instructions,
            quote,
            additional_signers,
            ..
        } = result?;

        let estimated_amount_out = estimated_out(&quote)?;
        logger::debug(
            LogTag::Swap,
            &format!(
                "Orca quote on {}: est out {} ({} instructions)",
                request.pool,
                estimated_amount_out,
                instructions.len()
            ),
        );

        Ok(OracleQuote {
            instructions,
            additional_signers,
            estimated_amount_out,
        })
    }
}
