use super::types::ActionState;
use crate::constants::TARGET_SYMBOL;
use crate::errors::BurnSwapError;
use crate::logger::{self, LogTag};
use crate::utils::{lamports_to_sol, short_address};
use solana_sdk::pubkey::Pubkey;

/// Receives free-text progress updates of a running action
pub trait StatusSink: Send + Sync {
    fn status(&self, text: String);
}

/// Discards updates
pub struct NoStatus;

impl StatusSink for NoStatus {
    fn status(&self, _text: String) {}
}

// =============================================================================
// STATUS TEXTS
// =============================================================================

pub fn account_will_be_closed(account: &Pubkey) -> String {
    format!(
        "Token account {}... will be closed",
        short_address(&account.to_string(), 15)
    )
}

pub fn closing_accounts(count: usize) -> String {
    match count {
        1 => "Closing 1 empty token account".to_string(),
        n => format!("Closing {} empty token accounts", n),
    }
}

pub fn reclaiming(lamports: u64) -> String {
    format!("You are reclaiming {} SOL", lamports_to_sol(lamports))
}

pub fn will_receive(estimate: &str) -> String {
    format!("You will receive {} {}", estimate, TARGET_SYMBOL)
}

pub const AWAITING_CONFIRMATION: &str = "Awaiting transaction confirmation...";

// =============================================================================
// ACTION TRACKER
// =============================================================================

/// State of one user action, with its id carried into every log line
pub struct ActionTracker {
    id: String,
    kind: &'static str,
    state: ActionState,
}

impl ActionTracker {
    pub fn new(kind: &'static str) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
        logger::debug(LogTag::Transactions, &format!("[{}] {} started", id, kind));
        Self {
            id,
            kind,
            state: ActionState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn advance(&mut self, next: ActionState) -> Result<(), BurnSwapError> {
        if !self.state.can_transition_to(next) {
            return Err(BurnSwapError::Data(format!(
                "[{}] {} cannot move from {} to {}",
                self.id, self.kind, self.state, next
            )));
        }

        logger::debug(
            LogTag::Transactions,
            &format!("[{}] {}: {} → {}", self.id, self.kind, self.state, next),
        );
        self.state = next;
        Ok(())
    }

    /// Marks the action failed and hands the error back
    pub fn fail(&mut self, err: BurnSwapError) -> BurnSwapError {
        if !self.state.is_terminal() {
            logger::debug(
                LogTag::Transactions,
                &format!("[{}] {} failed in {}: {}", self.id, self.kind, self.state, err),
            );
            self.state = ActionState::Failed;
        }
        err
    }

    pub fn log(&self, message: &str) {
        logger::info(LogTag::Transactions, &format!("[{}] {}", self.id, message));
    }
}
