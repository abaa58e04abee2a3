/// Token accounts and token descriptors
///
/// - `scanner`: owned / empty classification of a wallet's token accounts
/// - `metadata`: mint → descriptor via the on-chain metadata account
/// - `burns`: optional burn rating of a mint
/// - `types`: records exchanged with the presentation layer
pub mod burns;
pub mod metadata;
pub mod scanner;
pub mod types;

pub use burns::{contains_burn_of, count_recent_burns};
pub use metadata::{decode_metadata, metadata_address, MetadataResolver};
pub use scanner::{partition_accounts, token_programs, AccountScanner};
pub use types::{EmptyTokenAccount, OnChainMetadata, TokenAccountRecord, TokenDescriptor};
