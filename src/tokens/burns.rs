/// Burn rating: how many of a mint's recent transactions burned it
use super::scanner::token_programs;
use crate::errors::RpcError;
use crate::logger::{self, LogTag};
use crate::rpc::Ledger;
use futures::future::try_join_all;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;

/// Whether a jsonParsed transaction contains a top-level token burn of `mint`
pub fn contains_burn_of(transaction: &Value, mint: &Pubkey) -> bool {
    let mint = mint.to_string();
    let programs: Vec<String> = token_programs().iter().map(|p| p.to_string()).collect();

    let Some(instructions) = transaction
        .pointer("/transaction/message/instructions")
        .and_then(Value::as_array)
    else {
        return false;
    };

    instructions.iter().any(|ix| {
        let is_token_program = ix
            .get("programId")
            .and_then(Value::as_str)
            .map(|program| programs.iter().any(|p| p == program))
            .unwrap_or(false);
        let is_burn = matches!(
            ix.pointer("/parsed/type").and_then(Value::as_str),
            Some("burn") | Some("burnChecked")
        );
        let same_mint = ix.pointer("/parsed/info/mint").and_then(Value::as_str) == Some(mint.as_str());

        is_token_program && is_burn && same_mint
    })
}

/// Number of the `limit` most recent transactions of `mint` that burn it
pub async fn count_recent_burns(
    ledger: &dyn Ledger,
    mint: &Pubkey,
    limit: usize,
) -> Result<u32, RpcError> {
    let signatures = ledger.get_signatures_for_address(mint, limit).await?;
    let transactions =
        try_join_all(signatures.iter().map(|sig| ledger.get_parsed_transaction(sig))).await?;

    let burns = transactions
        .iter()
        .flatten()
        .filter(|tx| contains_burn_of(tx, mint))
        .count() as u32;

    logger::debug(
        LogTag::Metadata,
        &format!("{} burns of {} in last {} transactions", burns, mint, signatures.len()),
    );
    Ok(burns)
}
