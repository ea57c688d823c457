use anchor_lang::prelude::*;

use crate::constants::*;

pub fn find_registry_address() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REGISTRY_SEED], &crate::ID)
}

pub fn find_pool_address(token_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED, token_mint.as_ref()], &crate::ID)
}

pub fn find_pool_token_address(pool: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_TOKEN_SEED, pool.as_ref()], &crate::ID)
}

pub fn find_voucher_mint_address(pool: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VOUCHER_MINT_SEED, pool.as_ref()], &crate::ID)
}
