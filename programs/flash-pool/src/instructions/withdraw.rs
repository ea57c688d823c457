use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::errors::FlashLoanError;
use crate::events::LiquidityWithdrawn;
use crate::receipt::{self, VoucherHolding};
use crate::state::Pool;
use crate::token::transfer_tokens_signed;

#[derive(Accounts)]
pub struct Withdraw<'info> {
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

/// Only the holder may redeem their vouchers, even though the pool burns them
/// as delegate. With no borrow in flight, voucher supply equals the pool
/// balance, so the liquidity check only trips on an accounting fault.
pub fn validate_withdraw(
    pool: &Pool,
    pool_authority: &Pubkey,
    user: &Pubkey,
    holding: &VoucherHolding,
    pool_balance: u64,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, FlashLoanError::InvalidAmount);
    require_keys_eq!(holding.owner, *user, FlashLoanError::Unauthorized);
    pool.ensure_idle()?;
    holding.check_redeemable(pool_authority, amount)?;
    require!(
        pool_balance >= amount,
        FlashLoanError::InsufficientPoolLiquidity
    );
    Ok(())
}

pub fn handle_withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let pool = &ctx.accounts.pool;
    validate_withdraw(
        pool,
        &pool.key(),
        &ctx.accounts.user.key(),
        &VoucherHolding::from_account(&ctx.accounts.user_voucher),
        ctx.accounts.pool_token.amount,
        amount,
    )?;

    let mint_key = pool.token_mint;
    let pool_seeds = &[POOL_SEED, mint_key.as_ref(), &[pool.bump]];

    receipt::redeem(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.voucher_mint.to_account_info(),
        ctx.accounts.user_voucher.to_account_info(),
        pool.to_account_info(),
        &[pool_seeds],
        amount,
    )?;

    transfer_tokens_signed(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.pool_token.to_account_info(),
        ctx.accounts.user_token.to_account_info(),
        pool.to_account_info(),
        amount,
        &[pool_seeds],
    )?;

    emit!(LiquidityWithdrawn {
        pool: pool.key(),
        depositor: ctx.accounts.user.key(),
        amount,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::program_error::ProgramError;

    struct Fixture {
        pool: Pool,
        pool_key: Pubkey,
        user: Pubkey,
        holding: VoucherHolding,
    }

    fn fixture(vouchers: u64) -> Fixture {
        let pool_key = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        Fixture {
            pool: Pool {
                token_mint: Pubkey::new_unique(),
                ..Pool::default()
            },
            pool_key,
            user,
            holding: VoucherHolding {
                owner: user,
                amount: vouchers,
                delegate: Some(pool_key),
                delegated_amount: vouchers,
            },
        }
    }

    fn assert_err(result: Result<()>, expected: FlashLoanError) {
        let err = result.expect_err("expected an error");
        assert_eq!(ProgramError::from(err), ProgramError::Custom(expected.into()));
    }

    #[test]
    fn holder_redeems_against_a_funded_pool() {
        let f = fixture(1_000);
        validate_withdraw(&f.pool, &f.pool_key, &f.user, &f.holding, 1_000, 1_000).unwrap();
    }

    #[test]
    fn pool_short_of_tokens_rejects_even_a_valid_holding() {
        let f = fixture(1_000);
        assert_err(
            validate_withdraw(&f.pool, &f.pool_key, &f.user, &f.holding, 999, 1_000),
            FlashLoanError::InsufficientPoolLiquidity,
        );
        validate_withdraw(&f.pool, &f.pool_key, &f.user, &f.holding, 999, 999).unwrap();
    }

    #[test]
    fn vouchers_of_another_holder_are_unauthorized() {
        let f = fixture(1_000);
        let stranger = Pubkey::new_unique();
        assert_err(
            validate_withdraw(&f.pool, &f.pool_key, &stranger, &f.holding, 1_000, 500),
            FlashLoanError::Unauthorized,
        );
    }

    #[test]
    fn zero_amount_is_rejected_first() {
        let f = fixture(0);
        assert_err(
            validate_withdraw(&f.pool, &f.pool_key, &Pubkey::new_unique(), &f.holding, 0, 0),
            FlashLoanError::InvalidAmount,
        );
    }

    #[test]
    fn open_borrow_blocks_withdrawal() {
        let mut f = fixture(1_000);
        f.pool.begin_borrow(Pubkey::new_unique(), 100, 0).unwrap();
        assert_err(
            validate_withdraw(&f.pool, &f.pool_key, &f.user, &f.holding, 1_000, 100),
            FlashLoanError::BorrowInProgress,
        );
    }
}
