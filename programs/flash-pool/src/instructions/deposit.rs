use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::errors::FlashLoanError;
use crate::events::LiquidityDeposited;
use crate::receipt;
use crate::state::Pool;
use crate::token::{ensure_transferable, transfer_tokens};

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(
        seeds = [POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        constraint = pool_token.key() == pool.pool_token @ FlashLoanError::InvalidPoolToken,
    )]
    pub pool_token: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = voucher_mint.key() == pool.voucher_mint @ FlashLoanError::InvalidVoucherMint,
    )]
    pub voucher_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = user_token.mint == pool.token_mint @ FlashLoanError::MintMismatch,
    )]
    pub user_token: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = user_voucher.mint == pool.voucher_mint @ FlashLoanError::MintMismatch,
    )]
    pub user_voucher: Account<'info, TokenAccount>,

    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn validate_deposit(pool: &Pool, user_balance: u64, amount: u64) -> Result<()> {
    require!(amount > 0, FlashLoanError::InvalidAmount);
    pool.ensure_idle()?;
    ensure_transferable(user_balance, amount)
}

pub fn handle_deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let pool = &ctx.accounts.pool;
    validate_deposit(pool, ctx.accounts.user_token.amount, amount)?;

    transfer_tokens(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.user_token.to_account_info(),
        ctx.accounts.pool_token.to_account_info(),
        ctx.accounts.user.to_account_info(),
        amount,
    )?;

    // PDA signer seeds for the voucher mint authority
    let mint_key = pool.token_mint;
    let pool_seeds = &[POOL_SEED, mint_key.as_ref(), &[pool.bump]];

    receipt::issue(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.voucher_mint.to_account_info(),
        ctx.accounts.user_voucher.to_account_info(),
        pool.to_account_info(),
        &[pool_seeds],
        amount,
    )?;

    emit!(LiquidityDeposited {
        pool: pool.key(),
        depositor: ctx.accounts.user.key(),
        amount,
    });

    Ok(())
}
