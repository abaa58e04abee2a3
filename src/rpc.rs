/// Ledger access over Solana JSON-RPC
///
/// `Ledger` is the black-box transaction log the workflow reads from and
/// submits to. `RpcClient` implements it with plain JSON-RPC 2.0 requests over
/// reqwest. No retry, no fallback endpoint, no timeout: a single failure ends
/// the user action that issued it.
use crate::errors::RpcError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Token amount as reported by the jsonParsed encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    /// Raw amount, arbitrary precision decimal string
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount: Option<f64>,
    #[serde(default)]
    pub ui_amount_string: String,
}

/// One token account from a bulk owner scan
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTokenAccount {
    pub pubkey: Pubkey,
    pub mint: Pubkey,
    /// Token program owning the account (SPL Token or Token-2022)
    pub program_id: Pubkey,
    pub lamports: u64,
    pub token_amount: UiTokenAmount,
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// All token accounts of `owner` under one token program
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<ParsedTokenAccount>, RpcError>;

    /// Lamport balance of any account (0 when it does not exist)
    async fn get_balance(&self, account: &Pubkey) -> Result<u64, RpcError>;

    async fn get_token_account_balance(&self, account: &Pubkey) -> Result<UiTokenAmount, RpcError>;

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, RpcError>;

    /// Freshness token for a new transaction
    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError>;

    /// Most recent signatures touching `address`, newest first
    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<String>, RpcError>;

    /// Transaction in jsonParsed encoding, None when unknown to the node
    async fn get_parsed_transaction(&self, signature: &str) -> Result<Option<Value>, RpcError>;
}

// =============================================================================
// JSON-RPC WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct KeyedAccount {
    pubkey: String,
    account: ParsedAccount,
}

#[derive(Debug, Deserialize)]
struct ParsedAccount {
    lamports: u64,
    owner: String,
    data: ParsedAccountData,
}

#[derive(Debug, Deserialize)]
struct ParsedAccountData {
    parsed: ParsedTokenData,
}

#[derive(Debug, Deserialize)]
struct ParsedTokenData {
    info: ParsedTokenInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedTokenInfo {
    mint: String,
    token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
struct EncodedAccount {
    lamports: u64,
    owner: String,
    data: (String, String),
    #[serde(default)]
    executable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
}

#[derive(Debug, Deserialize)]
struct SignatureInfo {
    signature: String,
}

fn parse_address(value: &str, what: &str) -> Result<Pubkey, RpcError> {
    Pubkey::from_str(value)
        .map_err(|e| RpcError::InvalidResponse(format!("Invalid {} '{}': {}", what, value, e)))
}

fn decode_keyed_account(keyed: KeyedAccount) -> Result<ParsedTokenAccount, RpcError> {
    Ok(ParsedTokenAccount {
        pubkey: parse_address(&keyed.pubkey, "token account")?,
        mint: parse_address(&keyed.account.data.parsed.info.mint, "mint")?,
        program_id: parse_address(&keyed.account.owner, "token program")?,
        lamports: keyed.account.lamports,
        token_amount: keyed.account.data.parsed.info.token_amount,
    })
}

fn decode_account(encoded: EncodedAccount) -> Result<Account, RpcError> {
    let (payload, encoding) = encoded.data;
    if encoding != "base64" {
        return Err(RpcError::InvalidResponse(format!(
            "Unexpected account encoding '{}'",
            encoding
        )));
    }

    let data = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| RpcError::InvalidResponse(format!("Invalid account data: {}", e)))?;

    Ok(Account {
        lamports: encoded.lamports,
        data,
        owner: parse_address(&encoded.owner, "account owner")?,
        executable: encoded.executable,
        rent_epoch: 0,
    })
}

// =============================================================================
// RPC CLIENT
// =============================================================================

/// JSON-RPC client for a single endpoint
pub struct RpcClient {
    http: reqwest::Client,
    rpc_url: String,
    commitment: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(rpc_url: &str, commitment: &str) -> Self {
        logger::info(
            LogTag::Rpc,
            &format!("Initializing RPC client with URL: {} ({})", rpc_url, commitment),
        );

        Self {
            http: reqwest::Client::new(),
            rpc_url: rpc_url.to_string(),
            commitment: commitment.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.rpc_url
    }

    /// Issues one JSON-RPC call and decodes its `result`
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        logger::debug(LogTag::Rpc, &format!("→ {} (id {})", method, id));

        let response = self
            .http
            .post(&self.rpc_url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::InvalidResponse(format!(
                "{} returned HTTP {}: {}",
                method, status, body
            )));
        }

        let rpc_response: RpcResponse = response.json().await?;
        if let Some(error) = rpc_response.error {
            logger::debug(
                LogTag::Rpc,
                &format!("← {} failed: {} {}", method, error.code, error.message),
            );
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        serde_json::from_value(rpc_response.result.unwrap_or(Value::Null)).map_err(|e| {
            RpcError::InvalidResponse(format!("Unexpected {} result: {}", method, e))
        })
    }
}

#[async_trait]
impl Ledger for RpcClient {
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<ParsedTokenAccount>, RpcError> {
        let response: WithContext<Vec<KeyedAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    { "programId": program_id.to_string() },
                    { "encoding": "jsonParsed", "commitment": self.commitment }
                ]),
            )
            .await?;

        let accounts = response
            .value
            .into_iter()
            .map(decode_keyed_account)
            .collect::<Result<Vec<_>, _>>()?;

        logger::debug(
            LogTag::Rpc,
            &format!(
                "Found {} token accounts for {} under {}",
                accounts.len(),
                owner,
                program_id
            ),
        );
        Ok(accounts)
    }

    async fn get_balance(&self, account: &Pubkey) -> Result<u64, RpcError> {
        let response: WithContext<u64> = self
            .call(
                "getBalance",
                json!([account.to_string(), { "commitment": self.commitment }]),
            )
            .await?;
        Ok(response.value)
    }

    async fn get_token_account_balance(&self, account: &Pubkey) -> Result<UiTokenAmount, RpcError> {
        let response: WithContext<UiTokenAmount> = self
            .call(
                "getTokenAccountBalance",
                json!([account.to_string(), { "commitment": self.commitment }]),
            )
            .await?;
        Ok(response.value)
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, RpcError> {
        let response: WithContext<Option<EncodedAccount>> = self
            .call(
                "getAccountInfo",
                json!([
                    pubkey.to_string(),
                    { "encoding": "base64", "commitment": self.commitment }
                ]),
            )
            .await?;

        response.value.map(decode_account).transpose()
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let response: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment }]),
            )
            .await?;

        Hash::from_str(&response.value.blockhash).map_err(|e| {
            RpcError::InvalidResponse(format!(
                "Invalid blockhash '{}': {}",
                response.value.blockhash, e
            ))
        })
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        let serialized_tx = bincode::serialize(transaction)
            .map_err(|e| RpcError::InvalidResponse(format!("Failed to serialize transaction: {}", e)))?;
        let tx_base64 = general_purpose::STANDARD.encode(&serialized_tx);

        let signature: String = self
            .call(
                "sendTransaction",
                json!([
                    tx_base64,
                    {
                        "encoding": "base64",
                        "skipPreflight": false,
                        "preflightCommitment": self.commitment
                    }
                ]),
            )
            .await?;

        logger::info(LogTag::Rpc, &format!("Transaction sent: {}", signature));

        Signature::from_str(&signature).map_err(|e| {
            RpcError::InvalidResponse(format!("Invalid signature '{}': {}", signature, e))
        })
    }

    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<String>, RpcError> {
        let infos: Vec<SignatureInfo> = self
            .call(
                "getSignaturesForAddress",
                json!([
                    address.to_string(),
                    { "limit": limit, "commitment": self.commitment }
                ]),
            )
            .await?;
        Ok(infos.into_iter().map(|info| info.signature).collect())
    }

    async fn get_parsed_transaction(&self, signature: &str) -> Result<Option<Value>, RpcError> {
        self.call(
            "getTransaction",
            json!([
                signature,
                {
                    "encoding": "jsonParsed",
                    "maxSupportedTransactionVersion": 0,
                    "commitment": self.commitment
                }
            ]),
        )
        .await
    }
}
