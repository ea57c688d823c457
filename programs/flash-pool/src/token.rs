use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::errors::FlashLoanError;

/// The token program fails on short balances with a generic error; surface
/// it as `TransferFailed` before the CPI.
pub fn ensure_transferable(source_balance: u64, amount: u64) -> Result<()> {
    require!(source_balance >= amount, FlashLoanError::TransferFailed);
    Ok(())
}

/// Transfer tokens from source to destination (user-signed)
pub fn transfer_tokens<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    token::transfer(
        CpiContext::new(token_program, Transfer { from, to, authority }),
        amount,
    )
}

/// Transfer tokens out of a pool-owned account with the pool PDA as signer
pub fn transfer_tokens_signed<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    token::transfer(
        CpiContext::new_with_signer(token_program, Transfer { from, to, authority }, signer_seeds),
        amount,
    )
}
