use super::*;
use crate::errors::BurnSwapError;
use crate::swaps::SwapQuoteBuilder;
use crate::testing::{
    connected_stub, CapturingWallet, MemoryLedger, RecordingStatus, StubOracle, STUB_SWAP_PROGRAM,
};
use crate::tokens::AccountScanner;
use crate::wallets::connect_wallet;
use solana_sdk::pubkey::Pubkey;
use spl_token::instruction::TokenInstruction;
use std::sync::Arc;

fn assembler(ledger: &Arc<MemoryLedger>, oracle: &Arc<StubOracle>) -> TransactionAssembler {
    TransactionAssembler::new(ledger.clone(), SwapQuoteBuilder::new(oracle.clone(), 100))
}

fn swap_amount(data: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(data);
    u64::from_le_bytes(bytes)
}

#[tokio::test]
async fn burn_orders_burn_close_then_swap() {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StubOracle::new(154_321_098_765));
    let (wallet, capture) = connected_stub("Stub").await;
    let owner = wallet.public_key;
    let mint = Pubkey::new_unique();
    let token_account = ledger.add_associated_token_account(&owner, &mint, "1000", 5, 2_039_280);
    let status = RecordingStatus::default();

    let signature = assembler(&ledger, &oracle)
        .assemble_burn_and_swap(&wallet, &mint, &status)
        .await
        .unwrap();

    let submissions = capture.submissions();
    assert_eq!(submissions.len(), 1);
    let submitted = &submissions[0];
    assert_eq!(submitted.transaction.signatures[0], signature);

    let ixs = &submitted.instructions;
    assert_eq!(ixs.len(), 4);

    assert_eq!(ixs[0].program_id, spl_token::id());
    assert_eq!(
        ixs[0].data,
        TokenInstruction::BurnChecked {
            amount: 1000,
            decimals: 5
        }
        .pack()
    );
    assert_eq!(ixs[0].accounts[0].pubkey, token_account);
    assert_eq!(ixs[0].accounts[1].pubkey, mint);

    assert_eq!(ixs[1].program_id, spl_token::id());
    assert_eq!(ixs[1].data, TokenInstruction::CloseAccount.pack());
    assert_eq!(ixs[1].accounts[0].pubkey, token_account);
    assert_eq!(ixs[1].accounts[1].pubkey, owner);

    assert_eq!(ixs[2].program_id, STUB_SWAP_PROGRAM);
    assert_eq!(ixs[3].program_id, STUB_SWAP_PROGRAM);
    assert_eq!(swap_amount(&ixs[3].data), 2_039_280);

    let message = &submitted.transaction.message;
    assert_eq!(message.recent_blockhash, ledger.blockhash());
    assert_eq!(message.account_keys[0], owner);
    assert_eq!(ledger.blockhash_requests(), 1);

    assert_eq!(
        status.messages(),
        vec![
            format!(
                "Token account {}... will be closed",
                &token_account.to_string()[..15]
            ),
            "You are reclaiming 0.00203928 SOL".to_string(),
            "You will receive ~1,543,211 BONK".to_string(),
            "Awaiting transaction confirmation...".to_string(),
        ]
    );
}

#[tokio::test]
async fn auxiliary_signers_sign_the_transaction() {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StubOracle::new(1).with_signers(2));
    let (wallet, capture) = connected_stub("Stub").await;
    let mint = Pubkey::new_unique();
    ledger.add_associated_token_account(&wallet.public_key, &mint, "42", 0, 2_039_280);

    assembler(&ledger, &oracle)
        .assemble_burn_and_swap(&wallet, &mint, &NoStatus)
        .await
        .unwrap();

    let submitted = &capture.submissions()[0];
    assert_eq!(submitted.transaction.signatures.len(), 3);
    assert!(submitted.transaction.verify().is_ok());
}

#[tokio::test]
async fn cleanup_closes_only_empty_accounts_and_swaps_their_rent() {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StubOracle::new(10_000_000));
    let (wallet, capture) = connected_stub("Stub").await;
    let owner = wallet.public_key;

    let first = ledger.add_token_account(&owner, &Pubkey::new_unique(), "0", 6, 2_039_280);
    ledger.add_token_account(&owner, &Pubkey::new_unique(), "5000", 6, 2_039_280);
    let second = ledger.add_token_account_with_program(
        &owner,
        &Pubkey::new_unique(),
        "0",
        9,
        2_074_080,
        &spl_token_2022::id(),
    );

    let empty = AccountScanner::new(ledger.clone())
        .list_empty(&owner)
        .await
        .unwrap();
    assert_eq!(empty.len(), 2);

    let status = RecordingStatus::default();
    let signature = assembler(&ledger, &oracle)
        .assemble_cleanup(&wallet, &empty, &status)
        .await
        .unwrap();
    assert!(signature.is_some());

    let ixs = &capture.submissions()[0].instructions;
    assert_eq!(ixs.len(), 4);
    assert_eq!(ixs[0].program_id, spl_token::id());
    assert_eq!(ixs[0].accounts[0].pubkey, first);
    assert_eq!(ixs[1].program_id, spl_token_2022::id());
    assert_eq!(ixs[1].accounts[0].pubkey, second);
    assert_eq!(ixs[0].data, TokenInstruction::CloseAccount.pack());
    assert_eq!(ixs[1].data, TokenInstruction::CloseAccount.pack());
    assert_eq!(swap_amount(&ixs[3].data), 2_039_280 + 2_074_080);

    assert_eq!(oracle.requests()[0].amount, 4_113_360);
    assert_eq!(status.messages()[0], "Closing 2 empty token accounts");
    assert_eq!(status.messages()[1], "You are reclaiming 0.00411336 SOL");
}

#[tokio::test]
async fn cleanup_without_empty_accounts_submits_nothing() {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StubOracle::new(1));
    let (wallet, capture) = connected_stub("Stub").await;

    let result = assembler(&ledger, &oracle)
        .assemble_cleanup(&wallet, &[], &NoStatus)
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(capture.submissions().is_empty());
    assert!(oracle.requests().is_empty());
    assert_eq!(ledger.blockhash_requests(), 0);
}

#[tokio::test]
async fn quote_failure_aborts_before_assembly() {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StubOracle::failing());
    let (wallet, capture) = connected_stub("Stub").await;
    let mint = Pubkey::new_unique();
    ledger.add_associated_token_account(&wallet.public_key, &mint, "1000", 5, 2_039_280);

    let err = assembler(&ledger, &oracle)
        .assemble_burn_and_swap(&wallet, &mint, &NoStatus)
        .await
        .unwrap_err();

    assert!(matches!(err, BurnSwapError::QuoteFailure(_)));
    assert!(capture.submissions().is_empty());
    assert_eq!(ledger.blockhash_requests(), 0);
}

#[tokio::test]
async fn rejected_signature_is_a_submission_failure() {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StubOracle::new(1));
    let capture = Arc::new(CapturingWallet::new("Refuser").failing_send());
    let wallet = connect_wallet(capture.clone()).await.unwrap();
    let mint = Pubkey::new_unique();
    ledger.add_associated_token_account(&wallet.public_key, &mint, "1000", 5, 2_039_280);

    let err = assembler(&ledger, &oracle)
        .assemble_burn_and_swap(&wallet, &mint, &NoStatus)
        .await
        .unwrap_err();

    assert!(matches!(err, BurnSwapError::SubmissionFailure(_)));
    assert!(capture.submissions().is_empty());
}

#[tokio::test]
async fn burn_of_unknown_mint_fails_without_quoting() {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StubOracle::new(1));
    let (wallet, capture) = connected_stub("Stub").await;

    let err = assembler(&ledger, &oracle)
        .assemble_burn_and_swap(&wallet, &Pubkey::new_unique(), &NoStatus)
        .await
        .unwrap_err();

    assert!(matches!(err, BurnSwapError::InvalidInput(_)));
    assert!(oracle.requests().is_empty());
    assert!(capture.submissions().is_empty());
}

#[tokio::test]
async fn disconnected_wallet_cannot_submit() {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StubOracle::new(1));
    let (wallet, capture) = connected_stub("Stub").await;
    let mint = Pubkey::new_unique();
    ledger.add_associated_token_account(&wallet.public_key, &mint, "1000", 5, 2_039_280);

    crate::wallets::WalletCapability::disconnect(capture.as_ref());

    let err = assembler(&ledger, &oracle)
        .assemble_burn_and_swap(&wallet, &mint, &NoStatus)
        .await
        .unwrap_err();
    assert!(matches!(err, BurnSwapError::SubmissionFailure(_)));
    assert!(capture.submissions().is_empty());
}
