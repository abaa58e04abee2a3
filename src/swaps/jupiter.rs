/// Jupiter router
///
/// Two calls per quote: `GET quote` for the route and estimated output, then
/// `POST swap-instructions` for the instructions themselves. Routing is pinned
/// to the whirlpool venue with direct routes and legacy transaction format, so
/// the instructions can be appended to our own transaction.
use super::config::{
    DEFAULT_SWAP_MODE, JUPITER_AS_LEGACY_TRANSACTION, JUPITER_DEXES, JUPITER_ONLY_DIRECT_ROUTES,
    JUPITER_WRAP_AND_UNWRAP_SOL,
};
use super::{OracleQuote, PricingOracle, QuoteRequest};
use crate::config::SwapConfig;
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use std::str::FromStr;

/// Fields of the quote response we read; the whole response is echoed back
/// to the swap-instructions endpoint untouched
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterQuoteSummary {
    in_amount: String,
    out_amount: String,
    #[serde(default)]
    price_impact_pct: Option<String>,
    #[serde(default)]
    route_plan: Vec<JupiterRouteStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterRouteStep {
    swap_info: JupiterSwapInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterSwapInfo {
    amm_key: String,
    #[serde(default)]
    label: Option<String>,
}

/// The route must be a single hop through `pool`
fn check_route(summary: &JupiterQuoteSummary, pool: &Pubkey) -> Result<(), BurnSwapError> {
    match summary.route_plan.as_slice() {
        [step] if step.swap_info.amm_key == pool.to_string() => Ok(()),
        [step] => Err(BurnSwapError::QuoteFailure(format!(
            "Route goes through {} ({}), expected pool {}",
            step.swap_info.amm_key,
            step.swap_info.label.as_deref().unwrap_or("unknown"),
            pool
        ))),
        steps => Err(BurnSwapError::QuoteFailure(format!(
            "Route has {} hops, expected one through pool {}",
            steps.len(),
            pool
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterAccountMeta {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterInstruction {
    pub program_id: String,
    pub accounts: Vec<JupiterAccountMeta>,
    /// Base64 instruction data
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapInstructionsResponse {
    #[serde(default)]
    setup_instructions: Vec<JupiterInstruction>,
    swap_instruction: JupiterInstruction,
    #[serde(default)]
    cleanup_instruction: Option<JupiterInstruction>,
    #[serde(default)]
    address_lookup_table_addresses: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

fn quote_error(context: &str, err: impl std::fmt::Display) -> BurnSwapError {
    BurnSwapError::QuoteFailure(format!("{}: {}", context, err))
}

fn parse_key(value: &str) -> Result<Pubkey, BurnSwapError> {
    Pubkey::from_str(value).map_err(|e| quote_error(&format!("Invalid key '{}'", value), e))
}

impl JupiterInstruction {
    pub fn to_instruction(&self) -> Result<Instruction, BurnSwapError> {
        let accounts = self
            .accounts
            .iter()
            .map(|meta| {
                Ok(AccountMeta {
                    pubkey: parse_key(&meta.pubkey)?,
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
            })
            .collect::<Result<Vec<_>, BurnSwapError>>()?;

        let data = general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| quote_error("Invalid instruction data", e))?;

        Ok(Instruction {
            program_id: parse_key(&self.program_id)?,
            accounts,
            data,
        })
    }
}

/// Instructions in execution order: setup, swap, cleanup
fn collect_instructions(response: SwapInstructionsResponse) -> Result<Vec<Instruction>, BurnSwapError> {
    if let Some(error) = response.error {
        return Err(BurnSwapError::QuoteFailure(error));
    }
    if !response.address_lookup_table_addresses.is_empty() {
        return Err(BurnSwapError::QuoteFailure(
            "Route needs address lookup tables, not usable in a legacy transaction".to_string(),
        ));
    }

    let mut instructions = Vec::with_capacity(response.setup_instructions.len() + 2);
    for ix in &response.setup_instructions {
        instructions.push(ix.to_instruction()?);
    }
    instructions.push(response.swap_instruction.to_instruction()?);
    if let Some(cleanup) = &response.cleanup_instruction {
        instructions.push(cleanup.to_instruction()?);
    }
    Ok(instructions)
}

pub struct JupiterOracle {
    http: reqwest::Client,
    quote_api: String,
    swap_instructions_api: String,
}

impl JupiterOracle {
    pub fn new(config: &SwapConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            quote_api: config.jupiter_quote_api.clone(),
            swap_instructions_api: config.jupiter_swap_instructions_api.clone(),
        }
    }

    async fn get_quote(&self, request: &QuoteRequest) -> Result<Value, BurnSwapError> {
        let params = [
            ("inputMint", request.input_mint.to_string()),
            ("outputMint", request.output_mint.to_string()),
            ("amount", request.amount.to_string()),
            ("slippageBps", request.slippage_bps.to_string()),
            ("swapMode", DEFAULT_SWAP_MODE.to_string()),
            ("dexes", JUPITER_DEXES.to_string()),
            ("onlyDirectRoutes", JUPITER_ONLY_DIRECT_ROUTES.to_string()),
            ("asLegacyTransaction", JUPITER_AS_LEGACY_TRANSACTION.to_string()),
        ];

        let url = reqwest::Url::parse_with_params(&self.quote_api, &params)
            .map_err(|e| quote_error("Invalid quote URL", e))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| quote_error("Quote request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BurnSwapError::QuoteFailure(format!(
                "Quote API returned {}: {}",
                status, body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| quote_error("Invalid quote response", e))
    }

    async fn get_swap_instructions(
        &self,
        quote: Value,
        user: &Pubkey,
    ) -> Result<Vec<Instruction>, BurnSwapError> {
        let body = json!({
            "quoteResponse": quote,
            "userPublicKey": user.to_string(),
            "wrapAndUnwrapSol": JUPITER_WRAP_AND_UNWRAP_SOL,
            "asLegacyTransaction": JUPITER_AS_LEGACY_TRANSACTION,
        });

        let response = self
            .http
            .post(&self.swap_instructions_api)
            .json(&body)
            .send()
            .await
            .map_err(|e| quote_error("Swap instructions request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BurnSwapError::QuoteFailure(format!(
                "Swap instructions API returned {}: {}",
                status, body
            )));
        }

        let parsed: SwapInstructionsResponse = response
            .json()
            .await
            .map_err(|e| quote_error("Invalid swap instructions response", e))?;

        collect_instructions(parsed)
    }
}

#[async_trait]
impl PricingOracle for JupiterOracle {
    fn name(&self) -> &str {
        "jupiter"
    }

    async fn swap_instructions(&self, request: QuoteRequest) -> Result<OracleQuote, BurnSwapError> {
        let quote = self.get_quote(&request).await?;
        let summary: JupiterQuoteSummary = serde_json::from_value(quote.clone())
            .map_err(|e| quote_error("Unexpected quote shape", e))?;
        check_route(&summary, &request.pool)?;

        let estimated_amount_out = summary
            .out_amount
            .parse::<u64>()
            .map_err(|e| quote_error("Invalid outAmount", e))?;

        logger::debug(
            LogTag::Swap,
            &format!(
                "Jupiter quote: in {} out {} impact {}%",
                summary.in_amount,
                summary.out_amount,
                summary.price_impact_pct.as_deref().unwrap_or("?")
            ),
        );

        let instructions = self.get_swap_instructions(quote, &request.user).await?;

        Ok(OracleQuote {
            instructions,
            additional_signers: Vec::new(),
            estimated_amount_out,
        })
    }
}
