pub const REGISTRY_SEED: &[u8] = b"registry";
pub const POOL_SEED: &[u8] = b"pool";
pub const POOL_TOKEN_SEED: &[u8] = b"pool_token";
pub const VOUCHER_MINT_SEED: &[u8] = b"voucher";

/// Flash loan fee: 30 basis points = 0.3%
pub const FLASH_LOAN_FEE_BPS: u64 = 30;

pub const BPS_DENOMINATOR: u64 = 10_000;

/// Position of the borrower in the `repay` account list.
/// DO NOT CHANGE THE ORDER OF ACCOUNTS IN `Repay` WITHOUT UPDATING THESE.
pub const REPAY_USER_ACCOUNT_IDX: usize = 0;
/// Position of the pool in the `repay` account list.
pub const REPAY_POOL_ACCOUNT_IDX: usize = 1;
