/// Metadata resolver
///
/// Mint → on-chain metadata account (program-derived address) → off-chain JSON
/// document. Only a missing metadata account is an error; anything that goes
/// wrong with the document degrades to the on-chain name and a placeholder
/// image.
use super::burns::count_recent_burns;
use super::types::{OnChainMetadata, TokenDescriptor};
use crate::config::MetadataConfig;
use crate::constants::{METADATA_PROGRAM_ID, METADATA_SEED};
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use crate::rpc::Ledger;
use borsh::BorshDeserialize;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// Address of the metadata account of `mint`
pub fn metadata_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[METADATA_SEED, METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    )
    .0
}

/// Leading fields of a token metadata account; the rest is ignored
#[derive(BorshDeserialize)]
struct MetadataHeader {
    _key: u8,
    _update_authority: [u8; 32],
    mint: [u8; 32],
    name: String,
    symbol: String,
    uri: String,
}

/// Removes the NUL bytes fixed-size metadata fields are padded with
fn strip_padding(value: &str) -> String {
    value.replace('\0', "")
}

pub fn decode_metadata(data: &[u8]) -> Result<OnChainMetadata, BurnSwapError> {
    let header = MetadataHeader::deserialize(&mut &data[..])
        .map_err(|e| BurnSwapError::Data(format!("Invalid metadata account: {}", e)))?;

    Ok(OnChainMetadata {
        mint: Pubkey::new_from_array(header.mint),
        name: strip_padding(&header.name),
        symbol: strip_padding(&header.symbol),
        uri: strip_padding(&header.uri),
    })
}

/// Off-chain metadata document, only the fields shown to the user
#[derive(Debug, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Descriptor from the document when it is complete, otherwise the fallback
pub fn descriptor_from_document(
    metadata: &OnChainMetadata,
    document: Option<MetadataDocument>,
    placeholder_image: &str,
) -> TokenDescriptor {
    match document {
        Some(MetadataDocument {
            name: Some(name),
            image: Some(image),
        }) => TokenDescriptor {
            img: image,
            name,
            burn_rating: 0,
        },
        _ => TokenDescriptor {
            img: placeholder_image.to_string(),
            name: metadata.name.clone(),
            burn_rating: 0,
        },
    }
}

pub struct MetadataResolver {
    ledger: Arc<dyn Ledger>,
    http: reqwest::Client,
    config: MetadataConfig,
}

impl MetadataResolver {
    pub fn new(ledger: Arc<dyn Ledger>, config: MetadataConfig) -> Self {
        Self {
            ledger,
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Reads and decodes the on-chain metadata account of `mint`
    pub async fn on_chain_metadata(&self, mint: &Pubkey) -> Result<OnChainMetadata, BurnSwapError> {
        let address = metadata_address(mint);
        let account = self
            .ledger
            .get_account(&address)
            .await?
            .ok_or_else(|| BurnSwapError::MetadataNotFound {
                mint: mint.to_string(),
            })?;

        decode_metadata(&account.data)
    }

    async fn fetch_document(&self, uri: &str) -> Result<MetadataDocument, String> {
        let response = self
            .http
            .get(uri)
            .header("Cache-Control", "no-store")
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        response
            .json::<MetadataDocument>()
            .await
            .map_err(|e| e.to_string())
    }

    /// Descriptor for `mint`; fails only when the metadata account is missing
    /// or unreadable
    pub async fn resolve(&self, mint: &Pubkey) -> Result<TokenDescriptor, BurnSwapError> {
        let metadata = self.on_chain_metadata(mint).await?;

        let document = match self.fetch_document(&metadata.uri).await {
            Ok(document) => Some(document),
            Err(e) => {
                logger::warning(
                    LogTag::Metadata,
                    &format!("Metadata document for {} unavailable ({}): {}", mint, metadata.uri, e),
                );
                None
            }
        };

        let mut descriptor =
            descriptor_from_document(&metadata, document, &self.config.placeholder_image);

        if self.config.compute_burn_rating {
            descriptor.burn_rating = match count_recent_burns(
                self.ledger.as_ref(),
                mint,
                self.config.burn_rating_signature_limit,
            )
            .await
            {
                Ok(count) => count,
                Err(e) => {
                    logger::warning(
                        LogTag::Metadata,
                        &format!("Burn rating for {} unavailable: {}", mint, e),
                    );
                    0
                }
            };
        }

        logger::debug(
            LogTag::Metadata,
            &format!("Resolved {} as '{}' (rating {})", mint, descriptor.name, descriptor.burn_rating),
        );
        Ok(descriptor)
    }
}
