//! In-memory stand-ins for the ledger, the pricing oracle and wallets

use crate::constants::METADATA_PROGRAM_ID;
use crate::errors::{BurnSwapError, RpcError, WalletError};
use crate::rpc::{Ledger, ParsedTokenAccount, UiTokenAmount};
use crate::swaps::{OracleQuote, PricingOracle, QuoteRequest};
use crate::tokens::metadata_address;
use crate::transactions::{associated_token_address, AssembledTransaction, StatusSink, TokenProgram};
use crate::wallets::{connect_wallet, Readiness, WalletCapability, WalletHandle};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use solana_sdk::{
    account::Account,
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Program id of the instructions produced by `StubOracle`
pub const STUB_SWAP_PROGRAM: Pubkey = Pubkey::new_from_array([7; 32]);

// =============================================================================
// LEDGER
// =============================================================================

#[derive(Default)]
struct LedgerState {
    token_accounts: Vec<(Pubkey, ParsedTokenAccount)>,
    balances: HashMap<Pubkey, u64>,
    token_balances: HashMap<Pubkey, UiTokenAmount>,
    accounts: HashMap<Pubkey, Account>,
    signatures: HashMap<Pubkey, Vec<String>>,
    parsed_transactions: HashMap<String, Value>,
    sent: Vec<Transaction>,
    blockhash_requests: usize,
}

pub struct MemoryLedger {
    state: Mutex<LedgerState>,
    blockhash: Hash,
}

fn ui_amount(amount: &str, decimals: u8) -> UiTokenAmount {
    UiTokenAmount {
        amount: amount.to_string(),
        decimals,
        ui_amount: None,
        ui_amount_string: String::new(),
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            blockhash: Hash::new_unique(),
        }
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    fn insert_token_account(
        &self,
        address: Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
        amount: &str,
        decimals: u8,
        lamports: u64,
        program_id: &Pubkey,
    ) {
        let mut state = self.state.lock();
        state.token_accounts.push((
            *owner,
            ParsedTokenAccount {
                pubkey: address,
                mint: *mint,
                program_id: *program_id,
                lamports,
                token_amount: ui_amount(amount, decimals),
            },
        ));
        state.balances.insert(address, lamports);
        state.token_balances.insert(address, ui_amount(amount, decimals));
    }

    /// SPL Token account at a random address; returns the address
    pub fn add_token_account(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        amount: &str,
        decimals: u8,
        lamports: u64,
    ) -> Pubkey {
        self.add_token_account_with_program(owner, mint, amount, decimals, lamports, &spl_token::id())
    }

    pub fn add_token_account_with_program(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        amount: &str,
        decimals: u8,
        lamports: u64,
        program_id: &Pubkey,
    ) -> Pubkey {
        let address = Pubkey::new_unique();
        self.insert_token_account(address, owner, mint, amount, decimals, lamports, program_id);
        address
    }

    /// Mint plus the owner's associated token account for it
    pub fn add_associated_token_account(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        amount: &str,
        decimals: u8,
        lamports: u64,
    ) -> Pubkey {
        self.add_mint(mint, &spl_token::id());
        let address = associated_token_address(owner, mint, TokenProgram::Token);
        self.insert_token_account(address, owner, mint, amount, decimals, lamports, &spl_token::id());
        address
    }

    pub fn add_mint(&self, mint: &Pubkey, program_id: &Pubkey) {
        self.state.lock().accounts.insert(
            *mint,
            Account {
                lamports: 1_461_600,
                data: vec![0; 82],
                owner: *program_id,
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    pub fn add_metadata(&self, mint: &Pubkey, name: &str, symbol: &str, uri: &str) {
        self.state.lock().accounts.insert(
            metadata_address(mint),
            Account {
                lamports: 5_616_720,
                data: metadata_account_data(mint, name, symbol, uri),
                owner: METADATA_PROGRAM_ID,
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    /// Records a transaction touching `address`; later ones are more recent
    pub fn add_parsed_transaction(&self, address: &Pubkey, transaction: Value) {
        let signature = Hash::new_unique().to_string();
        let mut state = self.state.lock();
        state
            .signatures
            .entry(*address)
            .or_default()
            .push(signature.clone());
        state.parsed_transactions.insert(signature, transaction);
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().sent.clone()
    }

    pub fn blockhash_requests(&self) -> usize {
        self.state.lock().blockhash_requests
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<ParsedTokenAccount>, RpcError> {
        Ok(self
            .state
            .lock()
            .token_accounts
            .iter()
            .filter(|(account_owner, account)| {
                account_owner == owner && account.program_id == *program_id
            })
            .map(|(_, account)| account.clone())
            .collect())
    }

    async fn get_balance(&self, account: &Pubkey) -> Result<u64, RpcError> {
        Ok(self.state.lock().balances.get(account).copied().unwrap_or(0))
    }

    async fn get_token_account_balance(&self, account: &Pubkey) -> Result<UiTokenAmount, RpcError> {
        self.state
            .lock()
            .token_balances
            .get(account)
            .cloned()
            .ok_or_else(|| RpcError::Rpc {
                code: -32602,
                message: format!("Invalid param: could not find account {}", account),
            })
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, RpcError> {
        Ok(self.state.lock().accounts.get(pubkey).cloned())
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        self.state.lock().blockhash_requests += 1;
        Ok(self.blockhash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        transaction
            .verify()
            .map_err(|e| RpcError::InvalidResponse(format!("Transaction rejected: {}", e)))?;
        self.state.lock().sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<String>, RpcError> {
        Ok(self
            .state
            .lock()
            .signatures
            .get(address)
            .map(|sigs| sigs.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_parsed_transaction(&self, signature: &str) -> Result<Option<Value>, RpcError> {
        Ok(self.state.lock().parsed_transactions.get(signature).cloned())
    }
}

/// Metadata account bytes: key, update authority, mint, then the borsh
/// strings, followed by unrelated trailing fields
pub fn metadata_account_data(mint: &Pubkey, name: &str, symbol: &str, uri: &str) -> Vec<u8> {
    let mut data = vec![4u8];
    data.extend_from_slice(&[1u8; 32]);
    data.extend_from_slice(mint.as_ref());
    for field in [name, symbol, uri] {
        data.extend_from_slice(&(field.len() as u32).to_le_bytes());
        data.extend_from_slice(field.as_bytes());
    }
    data.extend_from_slice(&[0u8; 16]);
    data
}

/// A jsonParsed top-level SPL Token instruction on `mint`
pub fn parsed_token_instruction(kind: &str, mint: &Pubkey) -> Value {
    json!({
        "program": "spl-token",
        "programId": spl_token::id().to_string(),
        "parsed": {
            "type": kind,
            "info": {
                "account": Pubkey::new_unique().to_string(),
                "mint": mint.to_string(),
                "amount": "1"
            }
        },
        "stackHeight": null
    })
}

// =============================================================================
// PRICING ORACLE
// =============================================================================

/// Oracle answering every request with a setup and a swap instruction
///
/// The swap instruction's data is the requested input amount (little endian),
/// so tests can see what the swap was sized to.
pub struct StubOracle {
    amount_out: u64,
    signer_count: usize,
    fail: bool,
    requests: Mutex<Vec<QuoteRequest>>,
}

impl StubOracle {
    pub fn new(amount_out: u64) -> Self {
        Self {
            amount_out,
            signer_count: 0,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(0)
        }
    }

    pub fn with_signers(mut self, count: usize) -> Self {
        self.signer_count = count;
        self
    }

    pub fn requests(&self) -> Vec<QuoteRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PricingOracle for StubOracle {
    fn name(&self) -> &str {
        "stub"
    }

    async fn swap_instructions(&self, request: QuoteRequest) -> Result<OracleQuote, BurnSwapError> {
        self.requests.lock().push(request.clone());
        if self.fail {
            return Err(BurnSwapError::QuoteFailure("pool unavailable".to_string()));
        }

        let signers: Vec<Keypair> = (0..self.signer_count).map(|_| Keypair::new()).collect();

        let setup = Instruction {
            program_id: STUB_SWAP_PROGRAM,
            accounts: vec![AccountMeta::new(request.user, true)],
            data: vec![0],
        };

        let mut accounts = vec![AccountMeta::new(request.user, true), AccountMeta::new(request.pool, false)];
        accounts.extend(signers.iter().map(|k| AccountMeta::new(k.pubkey(), true)));
        let swap = Instruction {
            program_id: STUB_SWAP_PROGRAM,
            accounts,
            data: request.amount.to_le_bytes().to_vec(),
        };

        Ok(OracleQuote {
            instructions: vec![setup, swap],
            additional_signers: signers,
            estimated_amount_out: self.amount_out,
        })
    }
}

// =============================================================================
// WALLETS
// =============================================================================

/// What a `CapturingWallet` was asked to sign and send
#[derive(Debug, Clone)]
pub struct Submission {
    pub instructions: Vec<Instruction>,
    pub transaction: Transaction,
}

/// Wallet capability that signs locally and records submissions instead of
/// broadcasting them
pub struct CapturingWallet {
    name: String,
    icon: String,
    readiness: Readiness,
    mobile_proxy: bool,
    refuse_connect: bool,
    stay_disconnected: bool,
    fail_send: bool,
    owner: Keypair,
    connected: Mutex<bool>,
    submissions: Mutex<Vec<Submission>>,
}

impl CapturingWallet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: format!("{}.svg", name.to_lowercase()),
            readiness: Readiness::Installed,
            mobile_proxy: false,
            refuse_connect: false,
            stay_disconnected: false,
            fail_send: false,
            owner: Keypair::new(),
            connected: Mutex::new(false),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn as_mobile_proxy(mut self) -> Self {
        self.mobile_proxy = true;
        self
    }

    pub fn refusing_connect(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    pub fn staying_disconnected(mut self) -> Self {
        self.stay_disconnected = true;
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn owner_pubkey(&self) -> Pubkey {
        self.owner.pubkey()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().clone()
    }
}

#[async_trait]
impl WalletCapability for CapturingWallet {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &str {
        &self.icon
    }

    fn readiness(&self) -> Readiness {
        self.readiness
    }

    fn is_mobile_proxy(&self) -> bool {
        self.mobile_proxy
    }

    async fn connect(&self) -> Result<Pubkey, WalletError> {
        if self.refuse_connect {
            return Err(WalletError::ConnectionRefused("user rejected".to_string()));
        }
        if !self.stay_disconnected {
            *self.connected.lock() = true;
        }
        Ok(self.owner.pubkey())
    }

    fn disconnect(&self) {
        *self.connected.lock() = false;
    }

    fn is_connected(&self) -> bool {
        *self.connected.lock()
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.is_connected().then(|| self.owner.pubkey())
    }

    async fn sign_and_send(
        &self,
        transaction: AssembledTransaction,
    ) -> Result<Signature, WalletError> {
        if self.fail_send {
            return Err(WalletError::Signing("user rejected the request".to_string()));
        }

        let mut tx = transaction.to_transaction();
        let mut signers: Vec<&dyn Signer> = vec![&self.owner];
        for aux in &transaction.signers {
            signers.push(aux);
        }
        tx.try_sign(&signers, transaction.recent_blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;

        let signature = tx.signatures[0];
        self.submissions.lock().push(Submission {
            instructions: transaction.instructions.clone(),
            transaction: tx,
        });
        Ok(signature)
    }
}

/// Connected handle over a fresh `CapturingWallet`
pub async fn connected_stub(name: &str) -> (WalletHandle, Arc<CapturingWallet>) {
    let wallet = Arc::new(CapturingWallet::new(name));
    let handle = connect_wallet(wallet.clone())
        .await
        .expect("stub wallet connects");
    (handle, wallet)
}

// =============================================================================
// STATUS
// =============================================================================

#[derive(Default)]
pub struct RecordingStatus {
    messages: Mutex<Vec<String>>,
}

impl RecordingStatus {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl StatusSink for RecordingStatus {
    fn status(&self, text: String) {
        self.messages.lock().push(text);
    }
}
