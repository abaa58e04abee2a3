/// Token data exchanged with the presentation layer
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

// ============================================================================
// TOKEN ACCOUNTS
// ============================================================================

/// A non-empty token account, as listed to the user
///
/// Field names are part of the notification contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAccountRecord {
    #[serde(rename = "mintId")]
    pub mint_id: String,
    #[serde(rename = "tokenAcct")]
    pub token_acct: String,
    /// Raw amount, arbitrary precision decimal string
    pub amount: String,
    pub decimals: u8,
    /// Owning token program, needed to address burns and closes
    #[serde(skip)]
    pub program_id: Pubkey,
}

/// A zero-balance token account whose rent can be reclaimed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyTokenAccount {
    pub address: Pubkey,
    pub program_id: Pubkey,
}

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// Human-presentable view of a mint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub img: String,
    pub name: String,
    #[serde(rename = "burnRating")]
    pub burn_rating: u32,
}

/// Fields of the on-chain metadata account the resolver needs
#[derive(Debug, Clone, PartialEq)]
pub struct OnChainMetadata {
    pub mint: Pubkey,
    /// Name with null padding removed
    pub name: String,
    pub symbol: String,
    /// Off-chain document URI with null padding removed
    pub uri: String,
}
