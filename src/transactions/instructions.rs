// =============================================================================
// TOKEN INSTRUCTION BUILDERS
// =============================================================================

use crate::errors::BurnSwapError;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

/// Token program flavor owning a mint or token account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenProgram {
    Token,
    Token2022,
}

impl TokenProgram {
    pub fn from_owner(owner: &Pubkey) -> Result<Self, BurnSwapError> {
        if *owner == spl_token::id() {
            Ok(TokenProgram::Token)
        } else if *owner == spl_token_2022::id() {
            Ok(TokenProgram::Token2022)
        } else {
            Err(BurnSwapError::InvalidInput(format!(
                "Owner {} is not SPL Token or Token-2022 program",
                owner
            )))
        }
    }

    pub fn program_id(&self) -> Pubkey {
        match self {
            TokenProgram::Token => spl_token::id(),
            TokenProgram::Token2022 => spl_token_2022::id(),
        }
    }

    /// Close `account`, sending its rent to `owner`
    pub fn close_account(&self, account: &Pubkey, owner: &Pubkey) -> Result<Instruction, BurnSwapError> {
        let pid = self.program_id();
        let result = match self {
            TokenProgram::Token => {
                spl_token::instruction::close_account(&pid, account, owner, owner, &[])
            }
            TokenProgram::Token2022 => {
                spl_token_2022::instruction::close_account(&pid, account, owner, owner, &[])
            }
        };
        result.map_err(|e| {
            BurnSwapError::Data(format!("Failed to build close instruction for {}: {}", account, e))
        })
    }

    /// Burn `amount` raw units of `mint` held in `account`
    pub fn burn(
        &self,
        account: &Pubkey,
        mint: &Pubkey,
        owner: &Pubkey,
        amount: u64,
        decimals: u8,
    ) -> Result<Instruction, BurnSwapError> {
        let pid = self.program_id();
        let result = match self {
            TokenProgram::Token => spl_token::instruction::burn_checked(
                &pid, account, mint, owner, &[], amount, decimals,
            ),
            TokenProgram::Token2022 => spl_token_2022::instruction::burn_checked(
                &pid, account, mint, owner, &[], amount, decimals,
            ),
        };
        result.map_err(|e| {
            BurnSwapError::Data(format!("Failed to build burn instruction for {}: {}", account, e))
        })
    }
}

/// Associated token account of `owner` for `mint`
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey, program: TokenProgram) -> Pubkey {
    spl_associated_token_account::get_associated_token_address_with_program_id(
        owner,
        mint,
        &program.program_id(),
    )
}
