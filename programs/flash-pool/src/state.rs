use anchor_lang::prelude::*;

use crate::errors::FlashLoanError;

#[account]
#[derive(Debug, Default)]
pub struct Registry {
    /// The only key allowed to add pools
    pub authority: Pubkey,
    /// PDA bump seed
    pub bump: u8,
    /// Reserved for future upgrades
    pub _reserved: [u8; 32],
}

impl Registry {
    pub const SIZE: usize = 8  // discriminator
        + 32   // authority
        + 1    // bump
        + 32;  // _reserved

    /// A freshly allocated registry is all zeroes.
    pub fn is_initialized(&self) -> bool {
        self.authority != Pubkey::default()
    }

    pub fn is_authority(&self, signer: &Pubkey) -> bool {
        self.is_initialized() && self.authority == *signer
    }
}

#[account]
#[derive(Debug, Default)]
pub struct Pool {
    /// The underlying SPL token mint this pool lends
    pub token_mint: Pubkey,
    /// The pool's underlying token account (PDA-owned)
    pub pool_token: Pubkey,
    /// Receipt token minted 1:1 against deposits
    pub voucher_mint: Pubkey,
    /// Set while a flash loan is outstanding in the current transaction
    pub borrowing: bool,
    /// Borrower of the outstanding flash loan
    pub borrower: Pubkey,
    /// Principal of the outstanding flash loan
    pub outstanding: u64,
    /// Fee owed on the outstanding flash loan, fixed at borrow time
    pub outstanding_fee: u64,
    /// Lifetime fees collected by this pool
    pub total_fees_earned: u64,
    /// PDA bump seed
    pub bump: u8,
    /// Pool token account bump seed
    pub pool_token_bump: u8,
    /// Voucher mint bump seed
    pub voucher_mint_bump: u8,
    /// Reserved for future upgrades
    pub _reserved: [u8; 32],
}

impl Pool {
    pub const SIZE: usize = 8  // discriminator
        + 32   // token_mint
        + 32   // pool_token
        + 32   // voucher_mint
        + 1    // borrowing
        + 32   // borrower
        + 8    // outstanding
        + 8    // outstanding_fee
        + 8    // total_fees_earned
        + 1    // bump
        + 1    // pool_token_bump
        + 1    // voucher_mint_bump
        + 32;  // _reserved

    pub fn is_initialized(&self) -> bool {
        self.token_mint != Pubkey::default()
    }

    /// Deposits and withdrawals are refused while liquidity is lent out.
    pub fn ensure_idle(&self) -> Result<()> {
        require!(!self.borrowing, FlashLoanError::BorrowInProgress);
        Ok(())
    }

    /// Idle -> BorrowActive(borrower, amount)
    pub fn begin_borrow(&mut self, borrower: Pubkey, amount: u64, fee: u64) -> Result<()> {
        require!(!self.borrowing, FlashLoanError::DoubleBorrow);

        self.borrowing = true;
        self.borrower = borrower;
        self.outstanding = amount;
        self.outstanding_fee = fee;
        Ok(())
    }

    /// Principal plus the fee recorded at borrow time.
    pub fn repayment_due(&self) -> Result<u64> {
        self.outstanding
            .checked_add(self.outstanding_fee)
            .ok_or_else(|| error!(FlashLoanError::MathOverflow))
    }

    /// BorrowActive(repayer, _) -> Idle. Returns the fee collected.
    pub fn settle_repay(&mut self, repayer: &Pubkey, amount: u64) -> Result<u64> {
        require!(
            self.borrowing && self.borrower == *repayer,
            FlashLoanError::RepayWithoutBorrow
        );
        require!(
            amount == self.repayment_due()?,
            FlashLoanError::AmountMismatch
        );

        let fee = self.outstanding_fee;
        self.total_fees_earned = self
            .total_fees_earned
            .checked_add(fee)
            .ok_or(FlashLoanError::MathOverflow)?;

        self.borrowing = false;
        self.borrower = Pubkey::default();
        self.outstanding = 0;
        self.outstanding_fee = 0;
        Ok(fee)
    }
}
