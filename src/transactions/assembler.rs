/// Transaction assembler
///
/// Builds the one atomic transaction of a user action and submits it through
/// the wallet. Instruction order is the execution order and is fixed:
/// burn → close(s) → swap. The swap is funded by the lamports the closes
/// release, so it must come last. Any failure before submission aborts the
/// action; nothing is ever submitted partially.
use super::instructions::{associated_token_address, TokenProgram};
use super::status::{self, ActionTracker, StatusSink};
use super::types::{ActionState, AssembledTransaction};
use crate::errors::BurnSwapError;
use crate::rpc::Ledger;
use crate::swaps::SwapQuoteBuilder;
use crate::tokens::EmptyTokenAccount;
use crate::utils::lamports_to_sol;
use crate::wallets::WalletHandle;
use futures::future::try_join_all;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct TransactionAssembler {
    ledger: Arc<dyn Ledger>,
    quotes: SwapQuoteBuilder,
}

impl TransactionAssembler {
    pub fn new(ledger: Arc<dyn Ledger>, quotes: SwapQuoteBuilder) -> Self {
        Self { ledger, quotes }
    }

    /// Closes every account in `empty_accounts` and swaps the reclaimed rent
    ///
    /// Returns None without touching the ledger when there is nothing to close.
    pub async fn assemble_cleanup(
        &self,
        wallet: &WalletHandle,
        empty_accounts: &[EmptyTokenAccount],
        sink: &dyn StatusSink,
    ) -> Result<Option<Signature>, BurnSwapError> {
        let mut tracker = ActionTracker::new("cleanup");

        if empty_accounts.is_empty() {
            tracker.log(&format!("No empty token accounts for {}", wallet.public_key));
            return Ok(None);
        }

        match self.run_cleanup(&mut tracker, wallet, empty_accounts, sink).await {
            Ok(signature) => Ok(Some(signature)),
            Err(e) => Err(tracker.fail(e)),
        }
    }

    async fn run_cleanup(
        &self,
        tracker: &mut ActionTracker,
        wallet: &WalletHandle,
        empty_accounts: &[EmptyTokenAccount],
        sink: &dyn StatusSink,
    ) -> Result<Signature, BurnSwapError> {
        let owner = wallet.public_key;
        sink.status(status::closing_accounts(empty_accounts.len()));

        let balances = try_join_all(
            empty_accounts
                .iter()
                .map(|account| self.ledger.get_balance(&account.address)),
        )
        .await?;
        let reclaimed: u64 = balances.iter().sum();
        sink.status(status::reclaiming(reclaimed));

        tracker.advance(ActionState::Quoting)?;
        let (estimate, quote) = self.quotes.quote(reclaimed, wallet).await?;
        sink.status(status::will_receive(&estimate));

        tracker.advance(ActionState::Assembling)?;
        let mut instructions = Vec::with_capacity(empty_accounts.len() + quote.instructions.len());
        for account in empty_accounts {
            let program = TokenProgram::from_owner(&account.program_id)?;
            instructions.push(program.close_account(&account.address, &owner)?);
        }
        instructions.extend(quote.instructions);

        let transaction = self.finish(instructions, owner, quote.signers).await?;
        tracker.log(&format!(
            "Closing {} accounts, swapping {} SOL ({} instructions)",
            empty_accounts.len(),
            lamports_to_sol(reclaimed),
            transaction.instructions.len()
        ));

        sink.status(status::AWAITING_CONFIRMATION.to_string());
        self.submit(tracker, wallet, transaction).await
    }

    /// Burns the wallet's whole balance of `mint`, closes the account and
    /// swaps the reclaimed rent
    pub async fn assemble_burn_and_swap(
        &self,
        wallet: &WalletHandle,
        mint: &Pubkey,
        sink: &dyn StatusSink,
    ) -> Result<Signature, BurnSwapError> {
        let mut tracker = ActionTracker::new("burn");
        match self.run_burn(&mut tracker, wallet, mint, sink).await {
            Ok(signature) => Ok(signature),
            Err(e) => Err(tracker.fail(e)),
        }
    }

    async fn run_burn(
        &self,
        tracker: &mut ActionTracker,
        wallet: &WalletHandle,
        mint: &Pubkey,
        sink: &dyn StatusSink,
    ) -> Result<Signature, BurnSwapError> {
        let owner = wallet.public_key;

        let mint_account = self
            .ledger
            .get_account(mint)
            .await?
            .ok_or_else(|| BurnSwapError::InvalidInput(format!("Mint {} does not exist", mint)))?;
        let program = TokenProgram::from_owner(&mint_account.owner)?;

        let token_account = associated_token_address(&owner, mint, program);
        sink.status(status::account_will_be_closed(&token_account));

        let reclaimed = self.ledger.get_balance(&token_account).await?;
        sink.status(status::reclaiming(reclaimed));

        let token_balance = self.ledger.get_token_account_balance(&token_account).await?;
        let amount = token_balance.amount.parse::<u64>().map_err(|e| {
            BurnSwapError::Data(format!(
                "Invalid token amount '{}' for {}: {}",
                token_balance.amount, token_account, e
            ))
        })?;

        tracker.advance(ActionState::Quoting)?;
        let (estimate, quote) = self.quotes.quote(reclaimed, wallet).await?;
        sink.status(status::will_receive(&estimate));

        tracker.advance(ActionState::Assembling)?;
        let mut instructions = Vec::with_capacity(2 + quote.instructions.len());
        instructions.push(program.burn(&token_account, mint, &owner, amount, token_balance.decimals)?);
        instructions.push(program.close_account(&token_account, &owner)?);
        instructions.extend(quote.instructions);

        let transaction = self.finish(instructions, owner, quote.signers).await?;
        tracker.log(&format!(
            "Burning {} of {} from {}, swapping {} SOL",
            amount,
            mint,
            token_account,
            lamports_to_sol(reclaimed)
        ));

        sink.status(status::AWAITING_CONFIRMATION.to_string());
        self.submit(tracker, wallet, transaction).await
    }

    /// Attaches a freshly fetched blockhash and the fee payer
    async fn finish(
        &self,
        instructions: Vec<Instruction>,
        fee_payer: Pubkey,
        signers: Vec<Keypair>,
    ) -> Result<AssembledTransaction, BurnSwapError> {
        let recent_blockhash = self.ledger.get_latest_blockhash().await?;
        Ok(AssembledTransaction {
            instructions,
            recent_blockhash,
            fee_payer,
            signers,
        })
    }

    async fn submit(
        &self,
        tracker: &mut ActionTracker,
        wallet: &WalletHandle,
        transaction: AssembledTransaction,
    ) -> Result<Signature, BurnSwapError> {
        tracker.advance(ActionState::AwaitingSignature)?;
        let signature = wallet.sign_and_send(transaction).await?;
        tracker.advance(ActionState::Submitted)?;
        tracker.log(&format!("Submitted {}", signature));
        Ok(signature)
    }
}
