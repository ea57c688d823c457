use anchor_lang::prelude::*;

#[event]
pub struct RegistryInitialized {
    pub registry: Pubkey,
    pub authority: Pubkey,
}

#[event]
pub struct PoolAdded {
    pub pool: Pubkey,
    pub token_mint: Pubkey,
    pub pool_token: Pubkey,
    pub voucher_mint: Pubkey,
}

#[event]
pub struct LiquidityDeposited {
    pub pool: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LiquidityWithdrawn {
    pub pool: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
}

#[event]
pub struct FlashLoanBorrowed {
    pub pool: Pubkey,
    pub borrower: Pubkey,
    pub amount: u64,
    pub fee: u64,
}

#[event]
pub struct FlashLoanRepaid {
    pub pool: Pubkey,
    pub borrower: Pubkey,
    pub amount_repaid: u64,
    pub fee_paid: u64,
}
