//! Voucher (receipt) token accounting. Vouchers are minted 1:1 on deposit and
//! burned 1:1 on withdrawal; the pool PDA is the voucher mint authority and
//! burns as the holder's approved delegate.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, MintTo, TokenAccount};

use crate::errors::FlashLoanError;

/// The parts of a voucher token account that decide whether it can be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoucherHolding {
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    pub delegated_amount: u64,
}

impl VoucherHolding {
    pub fn from_account(account: &TokenAccount) -> Self {
        Self {
            owner: account.owner,
            amount: account.amount,
            delegate: account.delegate.into(),
            delegated_amount: account.delegated_amount,
        }
    }

    /// Holder must own `amount` vouchers and have approved `pool_authority`
    /// to spend at least that many.
    pub fn check_redeemable(&self, pool_authority: &Pubkey, amount: u64) -> Result<()> {
        require!(
            self.amount >= amount,
            FlashLoanError::InsufficientReceiptBalance
        );
        require!(
            self.delegate == Some(*pool_authority) && self.delegated_amount >= amount,
            FlashLoanError::InsufficientApproval
        );
        Ok(())
    }
}

/// Mint `amount` vouchers to `recipient`.
pub fn issue<'info>(
    token_program: AccountInfo<'info>,
    voucher_mint: AccountInfo<'info>,
    recipient: AccountInfo<'info>,
    pool_authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    token::mint_to(
        CpiContext::new_with_signer(
            token_program,
            MintTo {
                mint: voucher_mint,
                to: recipient,
                authority: pool_authority,
            },
            signer_seeds,
        ),
        amount,
    )
}

/// Burn `amount` vouchers from `holder`, spending the pool's delegation.
pub fn redeem<'info>(
    token_program: AccountInfo<'info>,
    voucher_mint: AccountInfo<'info>,
    holder: AccountInfo<'info>,
    pool_authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    token::burn(
        CpiContext::new_with_signer(
            token_program,
            Burn {
                mint: voucher_mint,
                from: holder,
                authority: pool_authority,
            },
            signer_seeds,
        ),
        amount,
    )
}
