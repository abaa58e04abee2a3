/// Account scanner
///
/// One bulk read per token program, partitioned client-side into owned
/// (non-zero) and empty (zero, reclaimable) accounts.
use super::types::{EmptyTokenAccount, TokenAccountRecord};
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use crate::rpc::{Ledger, ParsedTokenAccount};
use crate::utils::is_zero_amount;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// Token programs whose accounts are scanned
pub fn token_programs() -> [Pubkey; 2] {
    [spl_token::id(), spl_token_2022::id()]
}

/// Splits a scan into owned records and empty accounts, keeping scan order
pub fn partition_accounts(
    accounts: Vec<ParsedTokenAccount>,
) -> (Vec<TokenAccountRecord>, Vec<EmptyTokenAccount>) {
    let mut owned = Vec::new();
    let mut empty = Vec::new();

    for account in accounts {
        if is_zero_amount(&account.token_amount.amount) {
            empty.push(EmptyTokenAccount {
                address: account.pubkey,
                program_id: account.program_id,
            });
        } else {
            owned.push(TokenAccountRecord {
                mint_id: account.mint.to_string(),
                token_acct: account.pubkey.to_string(),
                amount: account.token_amount.amount,
                decimals: account.token_amount.decimals,
                program_id: account.program_id,
            });
        }
    }

    (owned, empty)
}

#[derive(Clone)]
pub struct AccountScanner {
    ledger: Arc<dyn Ledger>,
}

impl AccountScanner {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    async fn scan(&self, owner: &Pubkey) -> Result<Vec<ParsedTokenAccount>, BurnSwapError> {
        let mut accounts = Vec::new();
        for program_id in token_programs() {
            accounts.extend(self.ledger.get_token_accounts_by_owner(owner, &program_id).await?);
        }
        Ok(accounts)
    }

    /// Token accounts of `owner` with a non-zero balance
    pub async fn list_owned(&self, owner: &Pubkey) -> Result<Vec<TokenAccountRecord>, BurnSwapError> {
        let (owned, empty) = partition_accounts(self.scan(owner).await?);
        logger::debug(
            LogTag::Tokens,
            &format!("{}: {} owned, {} empty", owner, owned.len(), empty.len()),
        );
        Ok(owned)
    }

    /// Token accounts of `owner` with a zero balance
    pub async fn list_empty(&self, owner: &Pubkey) -> Result<Vec<EmptyTokenAccount>, BurnSwapError> {
        let (owned, empty) = partition_accounts(self.scan(owner).await?);
        logger::debug(
            LogTag::Tokens,
            &format!("{}: {} empty, {} owned", owner, empty.len(), owned.len()),
        );
        Ok(empty)
    }
}
