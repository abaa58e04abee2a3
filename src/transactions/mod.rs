/// Transaction assembly
///
/// - `types`: the assembled transaction and the per-action state machine
/// - `instructions`: burn / close builders for both token programs
/// - `status`: progress texts and action tracking
/// - `assembler`: the cleanup and burn-and-swap workflows
pub mod assembler;
pub mod instructions;
pub mod status;
pub mod types;

#[cfg(test)]
mod tests;

pub use assembler::TransactionAssembler;
pub use instructions::{associated_token_address, TokenProgram};
pub use status::{ActionTracker, NoStatus, StatusSink};
pub use types::{ActionState, AssembledTransaction};
