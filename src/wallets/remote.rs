/// HTTP signing proxy wallet
///
/// Stands in for a mobile wallet: the key lives on another device that exposes
/// a small HTTP surface.
///
/// - `GET  {endpoint}/health`  liveness, used by startup registration
/// - `GET  {endpoint}/account` returns `{"publicKey": "<base58>"}`
/// - `POST {endpoint}/sign`    takes `{"transaction": "<base64>"}` and returns
///   `{"signedTransaction": "<base64>"}`
///
/// The proxy only signs. Broadcasting stays local so the returned transaction
/// can be checked against what was sent for signing.
use super::capability::{Readiness, WalletCapability};
use crate::config::RemoteSignerConfig;
use crate::errors::WalletError;
use crate::logger::{self, LogTag};
use crate::rpc::Ledger;
use crate::transactions::AssembledTransaction;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::Transaction};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    public_key: String,
}

#[derive(Debug, Serialize)]
struct SignRequest {
    transaction: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignResponse {
    signed_transaction: String,
}

pub struct RemoteSignerWallet {
    name: String,
    icon: String,
    endpoint: String,
    http: reqwest::Client,
    public_key: RwLock<Option<Pubkey>>,
    ledger: Arc<dyn Ledger>,
}

impl RemoteSignerWallet {
    pub fn from_config(config: &RemoteSignerConfig, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            name: config.name.clone(),
            icon: config.icon.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            public_key: RwLock::new(None),
            ledger,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    /// Whether the proxy answers its health check
    pub async fn probe(&self) -> bool {
        match self.http.get(self.url("health")).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                logger::debug(
                    LogTag::Wallet,
                    &format!("Signer {} health returned {}", self.name, response.status()),
                );
                false
            }
            Err(e) => {
                logger::debug(
                    LogTag::Wallet,
                    &format!("Signer {} unreachable: {}", self.name, e),
                );
                false
            }
        }
    }
}

fn proxy_error(context: &str, err: impl std::fmt::Display) -> WalletError {
    WalletError::Proxy(format!("{}: {}", context, err))
}

pub fn encode_transaction(transaction: &Transaction) -> Result<String, WalletError> {
    let bytes = bincode::serialize(transaction)
        .map_err(|e| WalletError::Signing(format!("Failed to serialize transaction: {}", e)))?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

/// Decodes the proxy's answer and checks it is the transaction we asked to
/// have signed, carrying every required signature
pub fn verify_signed_transaction(
    expected: &Transaction,
    signed_base64: &str,
) -> Result<Transaction, WalletError> {
    let bytes = general_purpose::STANDARD
        .decode(signed_base64.trim())
        .map_err(|e| proxy_error("Invalid base64 in signed transaction", e))?;
    let signed: Transaction =
        bincode::deserialize(&bytes).map_err(|e| proxy_error("Invalid signed transaction", e))?;

    if signed.message != expected.message {
        return Err(WalletError::Proxy(
            "Signer returned a different transaction".to_string(),
        ));
    }

    signed
        .verify()
        .map_err(|e| WalletError::Signing(format!("Signature check failed: {}", e)))?;

    Ok(signed)
}

#[async_trait]
impl WalletCapability for RemoteSignerWallet {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &str {
        &self.icon
    }

    fn readiness(&self) -> Readiness {
        Readiness::Loadable
    }

    fn is_mobile_proxy(&self) -> bool {
        true
    }

    async fn connect(&self) -> Result<Pubkey, WalletError> {
        let response = self
            .http
            .get(self.url("account"))
            .send()
            .await
            .map_err(|e| WalletError::ConnectionRefused(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::ConnectionRefused(format!(
                "Signer answered {}",
                response.status()
            )));
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| proxy_error("Invalid account response", e))?;
        let pubkey = Pubkey::from_str(&account.public_key)
            .map_err(|e| proxy_error("Invalid public key", e))?;

        *self.public_key.write() = Some(pubkey);
        logger::info(
            LogTag::Wallet,
            &format!("Signer {} connected as {}", self.name, pubkey),
        );
        Ok(pubkey)
    }

    fn disconnect(&self) {
        if self.public_key.write().take().is_some() {
            logger::info(LogTag::Wallet, &format!("Signer {} disconnected", self.name));
        }
    }

    fn is_connected(&self) -> bool {
        self.public_key.read().is_some()
    }

    fn public_key(&self) -> Option<Pubkey> {
        *self.public_key.read()
    }

    async fn sign_and_send(
        &self,
        transaction: AssembledTransaction,
    ) -> Result<Signature, WalletError> {
        let owner = self.public_key().ok_or(WalletError::NotConnected)?;
        if transaction.fee_payer != owner {
            return Err(WalletError::Signing(format!(
                "Fee payer {} is not signer {}",
                transaction.fee_payer, owner
            )));
        }

        let mut unsigned = transaction.to_transaction();
        transaction
            .sign_auxiliary(&mut unsigned)
            .map_err(|e| WalletError::Signing(e.to_string()))?;

        let request = SignRequest {
            transaction: encode_transaction(&unsigned)?,
        };

        logger::debug(
            LogTag::Wallet,
            &format!("Requesting signature from {}", self.endpoint),
        );

        let response = self
            .http
            .post(self.url("sign"))
            .json(&request)
            .send()
            .await
            .map_err(|e| proxy_error("Sign request failed", e))?;

        if !response.status().is_success() {
            return Err(WalletError::Proxy(format!(
                "Signer rejected the transaction ({})",
                response.status()
            )));
        }

        let body: SignResponse = response
            .json()
            .await
            .map_err(|e| proxy_error("Invalid sign response", e))?;
        let signed = verify_signed_transaction(&unsigned, &body.signed_transaction)?;

        Ok(self.ledger.send_transaction(&signed).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BurnSwapError;
    use crate::testing::MemoryLedger;
    use serde_json::{json, Value};
    use solana_sdk::{
        hash::Hash, signature::Keypair, signer::Signer, system_instruction, system_program,
    };
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    /// Answers one HTTP request the way a phone-side signer would
    async fn answer(
        stream: TcpStream,
        owner: &Keypair,
        sign: bool,
        posted: &parking_lot::Mutex<Vec<Transaction>>,
    ) -> std::io::Result<()> {
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).await?;

        let mut content_length = 0usize;
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).await?;
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await?;

        let (status, reply) = if request_line.starts_with("GET /account") {
            ("200 OK", json!({ "publicKey": owner.pubkey().to_string() }))
        } else if request_line.starts_with("POST /sign") {
            let request: Value = serde_json::from_slice(&body).unwrap();
            let bytes = general_purpose::STANDARD
                .decode(request["transaction"].as_str().unwrap())
                .unwrap();
            let mut tx: Transaction = bincode::deserialize(&bytes).unwrap();
            posted.lock().push(tx.clone());
            if sign {
                let blockhash = tx.message.recent_blockhash;
                tx.try_partial_sign(&[owner], blockhash).unwrap();
            }
            ("200 OK", json!({ "signedTransaction": encode_transaction(&tx).unwrap() }))
        } else {
            ("404 Not Found", json!({}))
        };

        let reply = reply.to_string();
        let mut stream = reader.into_inner();
        stream
            .write_all(
                format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reply.len(),
                    reply
                )
                .as_bytes(),
            )
            .await?;
        stream.shutdown().await
    }

    /// Serves `/account` and `/sign` for `owner` on an ephemeral port
    async fn local_signer(
        owner: Arc<Keypair>,
        sign: bool,
    ) -> (String, Arc<parking_lot::Mutex<Vec<Transaction>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let posted = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let seen = posted.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let _ = answer(stream, &owner, sign, &seen).await;
            }
        });

        (endpoint, posted)
    }

    fn remote_wallet(endpoint: &str, ledger: Arc<MemoryLedger>) -> RemoteSignerWallet {
        let config = RemoteSignerConfig {
            name: "Phone".to_string(),
            icon: String::new(),
            endpoint: endpoint.to_string(),
        };
        RemoteSignerWallet::from_config(&config, ledger)
    }

    /// Payer funds an account that the auxiliary key must also sign for
    fn with_auxiliary_signer(owner: &Pubkey) -> (AssembledTransaction, Pubkey) {
        let aux = Keypair::new();
        let aux_pubkey = aux.pubkey();
        let transaction = AssembledTransaction {
            instructions: vec![system_instruction::create_account(
                owner,
                &aux_pubkey,
                2_039_280,
                165,
                &system_program::id(),
            )],
            recent_blockhash: Hash::new_unique(),
            fee_payer: *owner,
            signers: vec![aux],
        };
        (transaction, aux_pubkey)
    }

    fn transfer(owner: &Keypair) -> Transaction {
        let ix = system_instruction::transfer(&owner.pubkey(), &Pubkey::new_unique(), 10);
        let mut tx = Transaction::new_with_payer(&[ix], Some(&owner.pubkey()));
        tx.message.recent_blockhash = Hash::new_unique();
        tx
    }

    #[test]
    fn accepts_fully_signed_matching_transaction() {
        let owner = Keypair::new();
        let unsigned = transfer(&owner);
        let mut signed = unsigned.clone();
        signed.sign(&[&owner], unsigned.message.recent_blockhash);

        let returned = encode_transaction(&signed).unwrap();
        let verified = verify_signed_transaction(&unsigned, &returned).unwrap();
        assert_eq!(verified.signatures[0], signed.signatures[0]);
    }

    #[test]
    fn rejects_unsigned_or_altered_transactions() {
        let owner = Keypair::new();
        let unsigned = transfer(&owner);

        let returned = encode_transaction(&unsigned).unwrap();
        assert!(matches!(
            verify_signed_transaction(&unsigned, &returned),
            Err(WalletError::Signing(_))
        ));

        let mut other = transfer(&owner);
        other.sign(&[&owner], other.message.recent_blockhash);
        let returned = encode_transaction(&other).unwrap();
        assert!(matches!(
            verify_signed_transaction(&unsigned, &returned),
            Err(WalletError::Proxy(_))
        ));

        assert!(verify_signed_transaction(&unsigned, "%%%").is_err());
    }

    #[test]
    fn proxy_is_loadable_mobile_capability() {
        let config = RemoteSignerConfig {
            name: "Phone".to_string(),
            icon: String::new(),
            endpoint: "http://127.0.0.1:7777/".to_string(),
        };
        let wallet = RemoteSignerWallet::from_config(&config, Arc::new(MemoryLedger::new()));
        assert_eq!(wallet.readiness(), Readiness::Loadable);
        assert!(wallet.is_mobile_proxy());
        assert_eq!(wallet.endpoint(), "http://127.0.0.1:7777");
        assert_eq!(wallet.url("sign"), "http://127.0.0.1:7777/sign");
        assert!(!wallet.is_connected());
    }

    #[tokio::test]
    async fn signs_remotely_and_broadcasts_locally() {
        let owner = Arc::new(Keypair::new());
        let (endpoint, posted) = local_signer(owner.clone(), true).await;
        let ledger = Arc::new(MemoryLedger::new());
        let wallet = remote_wallet(&endpoint, ledger.clone());

        let (transaction, _) = with_auxiliary_signer(&owner.pubkey());
        assert!(matches!(
            wallet.sign_and_send(transaction).await,
            Err(WalletError::NotConnected)
        ));

        assert_eq!(wallet.connect().await.unwrap(), owner.pubkey());
        assert_eq!(wallet.public_key(), Some(owner.pubkey()));

        let (transaction, aux_pubkey) = with_auxiliary_signer(&owner.pubkey());
        let signature = wallet.sign_and_send(transaction).await.unwrap();

        let posted = posted.lock().clone();
        assert_eq!(posted.len(), 1);
        let sent_for_signing = &posted[0];
        assert_eq!(sent_for_signing.signatures[0], Signature::default());
        let aux_index = sent_for_signing
            .message
            .account_keys
            .iter()
            .position(|key| key == &aux_pubkey)
            .unwrap();
        assert!(sent_for_signing.signatures[aux_index]
            .verify(aux_pubkey.as_ref(), &sent_for_signing.message_data()));

        let sent = ledger.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].signatures[0], signature);
        assert!(sent[0].verify().is_ok());
    }

    #[tokio::test]
    async fn missing_payer_signature_is_a_submission_failure() {
        let owner = Arc::new(Keypair::new());
        let (endpoint, posted) = local_signer(owner.clone(), false).await;
        let ledger = Arc::new(MemoryLedger::new());
        let wallet = remote_wallet(&endpoint, ledger.clone());
        wallet.connect().await.unwrap();

        let (transaction, _) = with_auxiliary_signer(&owner.pubkey());
        let err = wallet.sign_and_send(transaction).await.unwrap_err();
        assert!(matches!(err, WalletError::Signing(_)));
        assert!(matches!(
            BurnSwapError::from(err),
            BurnSwapError::SubmissionFailure(_)
        ));

        assert_eq!(posted.lock().len(), 1);
        assert!(ledger.sent_transactions().is_empty());
    }
}
