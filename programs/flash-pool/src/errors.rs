use anchor_lang::prelude::*;

/// Codes are stable: append new variants at the end only.
#[error_code]
pub enum FlashLoanError {
    #[msg("Registry has already been initialized")]
    AlreadyInitialized,

    #[msg("Unauthorized: signer does not match the registry authority")]
    Unauthorized,

    #[msg("A pool already exists for this mint")]
    PoolAlreadyExists,

    #[msg("Insufficient receipt balance for withdrawal")]
    InsufficientReceiptBalance,

    #[msg("Receipt tokens have not been approved to the pool for this amount")]
    InsufficientApproval,

    #[msg("Insufficient pool liquidity")]
    InsufficientPoolLiquidity,

    #[msg("Token transfer failed: source balance too low")]
    TransferFailed,

    #[msg("A borrow is already in progress on this pool")]
    DoubleBorrow,

    #[msg("Borrow requires a matching repay later in the transaction")]
    NoRepay,

    #[msg("Repay amount does not equal principal plus fee")]
    AmountMismatch,

    #[msg("Repay has no matching borrow for this pool and user")]
    RepayWithoutBorrow,

    #[msg("Borrow cannot be invoked via CPI")]
    CpiBorrow,

    #[msg("Repay cannot be invoked via CPI")]
    CpiRepay,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Token mint does not match pool's token mint")]
    MintMismatch,

    #[msg("Pool token account does not match pool")]
    InvalidPoolToken,

    #[msg("Voucher mint does not match pool")]
    InvalidVoucherMint,

    #[msg("Account is not the instructions sysvar")]
    InvalidInstructionsSysvar,

    #[msg("Pool liquidity is lent out until the flash loan is repaid")]
    BorrowInProgress,
}
