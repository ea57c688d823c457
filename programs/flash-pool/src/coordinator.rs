//! Same-transaction borrow/repay protocol.
//!
//! A pool is Idle between transactions. `borrow` moves it to
//! BorrowActive(borrower, amount) only after proving a matching repay is
//! scheduled later in the transaction; `repay` settles it back to Idle. If the
//! scheduled repay never runs, the runtime discards the whole transaction,
//! borrow transfer included.

use anchor_lang::prelude::*;

use crate::errors::FlashLoanError;
use crate::fee::{flash_loan_fee, repayment_amount};
use crate::introspection::{ensure_top_level, find_scheduled_repay, InstructionIntrospector};
use crate::state::Pool;

#[derive(Debug, Clone, Copy)]
pub struct BorrowRequest {
    pub pool: Pubkey,
    pub borrower: Pubkey,
    pub amount: u64,
    /// Current balance of the pool's token account
    pub available: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowTerms {
    pub fee: u64,
    pub repayment: u64,
    /// Index of the repay instruction that settles this borrow
    pub repay_index: usize,
}

/// Runs every borrow check and, if all pass, records the loan on the pool.
/// The caller performs the transfer.
pub fn authorize_borrow<I: InstructionIntrospector>(
    pool: &mut Pool,
    request: &BorrowRequest,
    introspector: &I,
    program_id: &Pubkey,
) -> Result<BorrowTerms> {
    ensure_top_level(introspector, program_id, FlashLoanError::CpiBorrow)?;
    require!(request.amount > 0, FlashLoanError::InvalidAmount);
    require!(!pool.borrowing, FlashLoanError::DoubleBorrow);
    require!(
        request.amount <= request.available,
        FlashLoanError::InsufficientPoolLiquidity
    );

    // fee is computed once here and stored; repay checks the stored value
    let fee = flash_loan_fee(request.amount)?;
    let repayment = repayment_amount(request.amount, fee)?;
    let repay_index = find_scheduled_repay(
        introspector,
        program_id,
        &request.pool,
        &request.borrower,
        repayment,
    )?;

    pool.begin_borrow(request.borrower, request.amount, fee)?;

    Ok(BorrowTerms {
        fee,
        repayment,
        repay_index,
    })
}

/// Checks provenance and settles the outstanding loan. Returns the fee paid.
/// The caller performs the transfer.
pub fn authorize_repay<I: InstructionIntrospector>(
    pool: &mut Pool,
    repayer: &Pubkey,
    amount: u64,
    introspector: &I,
    program_id: &Pubkey,
) -> Result<u64> {
    ensure_top_level(introspector, program_id, FlashLoanError::CpiRepay)?;
    pool.settle_repay(repayer, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::BatchIntrospector;
    use anchor_lang::solana_program::{instruction::Instruction, program_error::ProgramError};
    use anchor_lang::InstructionData;

    fn assert_err<T: std::fmt::Debug>(result: Result<T>, expected: FlashLoanError) {
        let err = result.expect_err("expected an error");
        assert_eq!(ProgramError::from(err), ProgramError::Custom(expected.into()));
    }

    fn ix(data: Vec<u8>, user: Pubkey, pool: Pubkey) -> Instruction {
        Instruction {
            program_id: crate::ID,
            accounts: crate::accounts::Repay {
                user,
                pool,
                pool_token: Pubkey::default(),
                user_token: Pubkey::default(),
                instructions: Pubkey::default(),
                token_program: Pubkey::default(),
            }
            .to_account_metas(None),
            data,
        }
    }

    struct Setup {
        pool_key: Pubkey,
        user: Pubkey,
        pool: Pool,
    }

    fn setup() -> Setup {
        Setup {
            pool_key: Pubkey::new_unique(),
            user: Pubkey::new_unique(),
            pool: Pool {
                token_mint: Pubkey::new_unique(),
                ..Pool::default()
            },
        }
    }

    fn request(pool: Pubkey, borrower: Pubkey, amount: u64, available: u64) -> BorrowRequest {
        BorrowRequest {
            pool,
            borrower,
            amount,
            available,
        }
    }

    fn pair(s: &Setup, borrow: u64, repay: u64) -> BatchIntrospector {
        BatchIntrospector::new(vec![
            ix(crate::instruction::Borrow { amount: borrow }.data(), s.user, s.pool_key),
            ix(crate::instruction::Repay { amount: repay }.data(), s.user, s.pool_key),
        ])
    }

    #[test]
    fn borrow_records_loan_and_repay_clears_it() {
        let mut s = setup();
        let batch = pair(&s, 100_000_000_000, 100_300_000_000);

        let req = request(s.pool_key, s.user, 100_000_000_000, u64::MAX);
        let terms = authorize_borrow(&mut s.pool, &req, &batch, &crate::ID).unwrap();
        assert_eq!(
            terms,
            BorrowTerms {
                fee: 300_000_000,
                repayment: 100_300_000_000,
                repay_index: 1
            }
        );
        assert!(s.pool.borrowing);

        let batch = batch.at(1, 1);
        let fee = authorize_repay(&mut s.pool, &s.user, 100_300_000_000, &batch, &crate::ID).unwrap();
        assert_eq!(fee, 300_000_000);
        assert!(!s.pool.borrowing);
    }

    #[test]
    fn provenance_is_checked_before_anything_else() {
        let mut s = setup();
        s.pool.borrowing = true;
        let batch = pair(&s, 10, 10).at(0, 2);
        let req = request(s.pool_key, s.user, 10, 0);
        assert_err(
            authorize_borrow(&mut s.pool, &req, &batch, &crate::ID),
            FlashLoanError::CpiBorrow,
        );
        assert_err(
            authorize_repay(&mut s.pool, &s.user, 10, &batch, &crate::ID),
            FlashLoanError::CpiRepay,
        );
    }

    #[test]
    fn guard_precedes_liquidity_and_lookahead() {
        let mut s = setup();
        s.pool.borrowing = true;
        let batch = BatchIntrospector::new(vec![ix(
            crate::instruction::Borrow { amount: 10 }.data(),
            s.user,
            s.pool_key,
        )]);
        let req = request(s.pool_key, s.user, 10, 0);
        assert_err(
            authorize_borrow(&mut s.pool, &req, &batch, &crate::ID),
            FlashLoanError::DoubleBorrow,
        );
    }

    #[test]
    fn borrow_beyond_pool_balance_fails() {
        let mut s = setup();
        let batch = pair(&s, 1_001, 1_004);
        let req = request(s.pool_key, s.user, 1_001, 1_000);
        assert_err(
            authorize_borrow(&mut s.pool, &req, &batch, &crate::ID),
            FlashLoanError::InsufficientPoolLiquidity,
        );
        assert!(!s.pool.borrowing);
    }

    #[test]
    fn failed_lookahead_leaves_pool_idle() {
        let mut s = setup();
        let batch = pair(&s, 10_000, 10_031);
        let req = request(s.pool_key, s.user, 10_000, 10_000);
        assert_err(
            authorize_borrow(&mut s.pool, &req, &batch, &crate::ID),
            FlashLoanError::AmountMismatch,
        );
        assert!(!s.pool.borrowing);
    }

    #[test]
    fn zero_borrow_is_rejected() {
        let mut s = setup();
        let batch = pair(&s, 0, 0);
        let req = request(s.pool_key, s.user, 0, 10);
        assert_err(
            authorize_borrow(&mut s.pool, &req, &batch, &crate::ID),
            FlashLoanError::InvalidAmount,
        );
    }

    #[test]
    fn fee_is_fixed_at_borrow_time() {
        let mut s = setup();
        let batch = pair(&s, 10_000, 10_030);
        let req = request(s.pool_key, s.user, 10_000, 10_000);
        authorize_borrow(&mut s.pool, &req, &batch, &crate::ID).unwrap();

        // a repay re-deriving the fee at a different rate would not match
        let batch = batch.at(1, 1);
        assert_err(
            authorize_repay(&mut s.pool, &s.user, 10_050, &batch, &crate::ID),
            FlashLoanError::AmountMismatch,
        );
        authorize_repay(&mut s.pool, &s.user, 10_030, &batch, &crate::ID).unwrap();
    }
}
