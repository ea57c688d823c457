use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::errors::FlashLoanError;
use crate::events::PoolAdded;
use crate::state::{Pool, Registry};

#[derive(Accounts)]
pub struct AddPool<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        init_if_needed,
        seeds = [POOL_SEED, token_mint.key().as_ref()],
        bump,
        payer = authority,
        space = Pool::SIZE,
    )]
    pub pool: Account<'info, Pool>,

    pub token_mint: Account<'info, Mint>,

    #[account(
        init_if_needed,
        seeds = [POOL_TOKEN_SEED, pool.key().as_ref()],
        bump,
        payer = authority,
        token::mint = token_mint,
        token::authority = pool,
    )]
    pub pool_token: Account<'info, TokenAccount>,

    #[account(
        init_if_needed,
        seeds = [VOUCHER_MINT_SEED, pool.key().as_ref()],
        bump,
        payer = authority,
        mint::decimals = token_mint.decimals,
        mint::authority = pool,
    )]
    pub voucher_mint: Account<'info, Mint>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// The authority check runs first, so a non-authority never learns whether
/// the pool exists.
pub fn validate_add_pool(registry: &Registry, signer: &Pubkey, pool: &Pool) -> Result<()> {
    require!(registry.is_authority(signer), FlashLoanError::Unauthorized);
    require!(!pool.is_initialized(), FlashLoanError::PoolAlreadyExists);
    Ok(())
}

pub fn handle_add_pool(ctx: Context<AddPool>) -> Result<()> {
    validate_add_pool(
        &ctx.accounts.registry,
        &ctx.accounts.authority.key(),
        &ctx.accounts.pool,
    )?;

    let pool = &mut ctx.accounts.pool;
    pool.token_mint = ctx.accounts.token_mint.key();
    pool.pool_token = ctx.accounts.pool_token.key();
    pool.voucher_mint = ctx.accounts.voucher_mint.key();
    pool.borrowing = false;
    pool.borrower = Pubkey::default();
    pool.outstanding = 0;
    pool.outstanding_fee = 0;
    pool.total_fees_earned = 0;
    pool.bump = ctx.bumps.pool;
    pool.pool_token_bump = ctx.bumps.pool_token;
    pool.voucher_mint_bump = ctx.bumps.voucher_mint;
    pool._reserved = [0u8; 32];

    emit!(PoolAdded {
        pool: pool.key(),
        token_mint: pool.token_mint,
        pool_token: pool.pool_token,
        voucher_mint: pool.voucher_mint,
    });

    Ok(())
}
