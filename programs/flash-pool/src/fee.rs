use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, FLASH_LOAN_FEE_BPS};
use crate::errors::FlashLoanError;

/// `floor(amount * 30 / 10_000)`. Never rounds up.
pub fn flash_loan_fee(amount: u64) -> Result<u64> {
    let fee = (amount as u128)
        .checked_mul(FLASH_LOAN_FEE_BPS as u128)
        .ok_or(FlashLoanError::MathOverflow)?
        / BPS_DENOMINATOR as u128;
    u64::try_from(fee).map_err(|_| error!(FlashLoanError::MathOverflow))
}

/// Principal plus fee owed by the matching repay.
pub fn repayment_amount(amount: u64, fee: u64) -> Result<u64> {
    amount
        .checked_add(fee)
        .ok_or_else(|| error!(FlashLoanError::MathOverflow))
}
