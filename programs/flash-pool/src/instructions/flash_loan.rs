use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::coordinator::{authorize_borrow, authorize_repay, BorrowRequest};
use crate::errors::FlashLoanError;
use crate::events::{FlashLoanBorrowed, FlashLoanRepaid};
use crate::introspection::SysvarIntrospector;
use crate::state::Pool;
use crate::token::{ensure_transferable, transfer_tokens, transfer_tokens_signed};

// ─── BORROW ─────────────────────────────────────────────────────

#[derive(Accounts)]
pub struct Borrow<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
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
        constraint = user_token.mint == pool.token_mint @ FlashLoanError::MintMismatch,
    )]
    pub user_token: Account<'info, TokenAccount>,

    /// CHECK: Checked using address
    #[account(address = sysvar::instructions::ID @ FlashLoanError::InvalidInstructionsSysvar)]
    pub instructions: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn borrow_handler(ctx: Context<Borrow>, amount: u64) -> Result<()> {
    let instructions = ctx.accounts.instructions.to_account_info();
    let introspector = SysvarIntrospector::new(&instructions);

    let request = BorrowRequest {
        pool: ctx.accounts.pool.key(),
        borrower: ctx.accounts.user.key(),
        amount,
        available: ctx.accounts.pool_token.amount,
    };
    let terms = authorize_borrow(
        &mut ctx.accounts.pool,
        &request,
        &introspector,
        ctx.program_id,
    )?;
    msg!(
        "flash loan of {} settles at instruction {}",
        amount,
        terms.repay_index
    );

    // PDA signer seeds for pool token transfer
    let pool = &ctx.accounts.pool;
    let mint_key = pool.token_mint;
    let pool_seeds = &[POOL_SEED, mint_key.as_ref(), &[pool.bump]];

    transfer_tokens_signed(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.pool_token.to_account_info(),
        ctx.accounts.user_token.to_account_info(),
        pool.to_account_info(),
        amount,
        &[pool_seeds],
    )?;

    emit!(FlashLoanBorrowed {
        pool: request.pool,
        borrower: request.borrower,
        amount,
        fee: terms.fee,
    });

    Ok(())
}

// ─── REPAY ──────────────────────────────────────────────────────

/// DO NOT CHANGE THE ORDER OF ACCOUNTS IN THIS STRUCT,
/// ELSE UPDATE `REPAY_USER_ACCOUNT_IDX` AND `REPAY_POOL_ACCOUNT_IDX`
#[derive(Accounts)]
pub struct Repay<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
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
        constraint = user_token.mint == pool.token_mint @ FlashLoanError::MintMismatch,
    )]
    pub user_token: Account<'info, TokenAccount>,

    /// CHECK: Checked using address
    #[account(address = sysvar::instructions::ID @ FlashLoanError::InvalidInstructionsSysvar)]
    pub instructions: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn repay_handler(ctx: Context<Repay>, amount: u64) -> Result<()> {
    let instructions = ctx.accounts.instructions.to_account_info();
    let introspector = SysvarIntrospector::new(&instructions);

    let fee = authorize_repay(
        &mut ctx.accounts.pool,
        &ctx.accounts.user.key(),
        amount,
        &introspector,
        ctx.program_id,
    )?;
    ensure_transferable(ctx.accounts.user_token.amount, amount)?;

    transfer_tokens(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.user_token.to_account_info(),
        ctx.accounts.pool_token.to_account_info(),
        ctx.accounts.user.to_account_info(),
        amount,
    )?;

    emit!(FlashLoanRepaid {
        pool: ctx.accounts.pool.key(),
        borrower: ctx.accounts.user.key(),
        amount_repaid: amount,
        fee_paid: fee,
    });

    Ok(())
}
