// =============================================================================
// CORE DATA STRUCTURES
// =============================================================================

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::Keypair,
    signer::{Signer, SignerError},
    transaction::Transaction,
};
use std::fmt;

/// One atomic transaction, built once per user action and submitted once
///
/// Instruction order is execution order on chain: burn, then closes, then the
/// swap instructions funded by the closes.
pub struct AssembledTransaction {
    pub instructions: Vec<Instruction>,
    /// Freshness token fetched right before submission
    pub recent_blockhash: Hash,
    pub fee_payer: Pubkey,
    /// Auxiliary signers required by the swap instructions
    pub signers: Vec<Keypair>,
}

impl AssembledTransaction {
    /// Unsigned legacy transaction with payer and blockhash set
    pub fn to_transaction(&self) -> Transaction {
        let mut transaction = Transaction::new_with_payer(&self.instructions, Some(&self.fee_payer));
        transaction.message.recent_blockhash = self.recent_blockhash;
        transaction
    }

    /// Adds the auxiliary signatures, leaving the fee payer's slot empty
    pub fn sign_auxiliary(&self, transaction: &mut Transaction) -> Result<(), SignerError> {
        if self.signers.is_empty() {
            return Ok(());
        }
        let signers: Vec<&dyn Signer> = self.signers.iter().map(|k| k as &dyn Signer).collect();
        transaction.try_partial_sign(&signers, self.recent_blockhash)
    }

    pub fn auxiliary_pubkeys(&self) -> Vec<Pubkey> {
        self.signers.iter().map(|k| k.pubkey()).collect()
    }
}

impl fmt::Debug for AssembledTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssembledTransaction")
            .field("instructions", &self.instructions.len())
            .field("recent_blockhash", &self.recent_blockhash)
            .field("fee_payer", &self.fee_payer)
            .field("signers", &self.auxiliary_pubkeys())
            .finish()
    }
}

// =============================================================================
// ACTION STATE MACHINE
// =============================================================================

/// Lifecycle of one user-initiated action
///
/// Idle → Quoting → Assembling → AwaitingSignature → Submitted, with Failed
/// reachable from every non-terminal state. Terminal states never resume; a
/// failed action is retried from Idle by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Quoting,
    Assembling,
    AwaitingSignature,
    Submitted,
    Failed,
}

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Submitted | ActionState::Failed)
    }

    pub fn can_transition_to(&self, next: ActionState) -> bool {
        use ActionState::*;
        match (self, next) {
            (Idle, Quoting)
            | (Quoting, Assembling)
            | (Assembling, AwaitingSignature)
            | (AwaitingSignature, Submitted) => true,
            (current, Failed) => !current.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionState::Idle => "Idle",
            ActionState::Quoting => "Quoting",
            ActionState::Assembling => "Assembling",
            ActionState::AwaitingSignature => "AwaitingSignature",
            ActionState::Submitted => "Submitted",
            ActionState::Failed => "Failed",
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
