//! Read-only view over the instructions of the executing transaction.
//!
//! Borrow and repay use it for two checks:
//! - provenance: the instruction must be top level (stack height 1) and the
//!   top-level instruction at the current index must target this program
//! - lookahead: a borrow must be followed, later in the same transaction, by a
//!   repay for the same pool and borrower carrying principal + fee

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{get_stack_height, Instruction, TRANSACTION_LEVEL_STACK_HEIGHT},
    program_error::ProgramError,
    sysvar::instructions::{load_current_index_checked, load_instruction_at_checked},
};
use anchor_lang::Discriminator;

use crate::constants::{REPAY_POOL_ACCOUNT_IDX, REPAY_USER_ACCOUNT_IDX};
use crate::errors::FlashLoanError;

pub trait InstructionIntrospector {
    /// Index of the executing top-level instruction.
    fn current_index(&self) -> Result<usize>;

    /// Invocation depth of the executing instruction, 1 when called directly
    /// by the transaction.
    fn stack_height(&self) -> usize;

    /// Top-level instruction at `index`, or `None` past the end of the transaction.
    fn instruction_at(&self, index: usize) -> Option<Instruction>;
}

/// Backed by the Instructions sysvar and the runtime stack height.
pub struct SysvarIntrospector<'a, 'info> {
    sysvar: &'a AccountInfo<'info>,
}

impl<'a, 'info> SysvarIntrospector<'a, 'info> {
    pub fn new(sysvar: &'a AccountInfo<'info>) -> Self {
        Self { sysvar }
    }
}

impl InstructionIntrospector for SysvarIntrospector<'_, '_> {
    fn current_index(&self) -> Result<usize> {
        Ok(load_current_index_checked(self.sysvar)? as usize)
    }

    fn stack_height(&self) -> usize {
        get_stack_height()
    }

    fn instruction_at(&self, index: usize) -> Option<Instruction> {
        load_instruction_at_checked(index, self.sysvar).ok()
    }
}

/// An in-memory batch of instructions, for simulating a transaction off-chain.
/// `BatchIntrospector::default()` is an empty transaction.
#[derive(Debug, Clone, Default)]
pub struct BatchIntrospector {
    instructions: Vec<Instruction>,
    current: usize,
    stack_height: usize,
}

impl BatchIntrospector {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            current: 0,
            stack_height: TRANSACTION_LEVEL_STACK_HEIGHT,
        }
    }

    /// Positions the batch at `index`, invoked at `stack_height`.
    pub fn at(mut self, index: usize, stack_height: usize) -> Self {
        self.current = index;
        self.stack_height = stack_height;
        self
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl InstructionIntrospector for BatchIntrospector {
    fn current_index(&self) -> Result<usize> {
        if self.current < self.instructions.len() {
            Ok(self.current)
        } else {
            Err(ProgramError::InvalidArgument.into())
        }
    }

    fn stack_height(&self) -> usize {
        self.stack_height
    }

    fn instruction_at(&self, index: usize) -> Option<Instruction> {
        self.instructions.get(index).cloned()
    }
}

/// A top-level `repay` decoded from raw instruction bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRepay {
    pub user: Pubkey,
    pub pool: Pubkey,
    pub amount: u64,
}

impl ScheduledRepay {
    /// `None` unless `ix` targets `program_id` and decodes as `repay`.
    pub fn decode(ix: &Instruction, program_id: &Pubkey) -> Option<Self> {
        if ix.program_id != *program_id {
            return None;
        }
        let mut args = ix.data.strip_prefix(crate::instruction::Repay::DISCRIMINATOR)?;
        let repay = crate::instruction::Repay::deserialize(&mut args).ok()?;

        Some(Self {
            user: ix.accounts.get(REPAY_USER_ACCOUNT_IDX)?.pubkey,
            pool: ix.accounts.get(REPAY_POOL_ACCOUNT_IDX)?.pubkey,
            amount: repay.amount,
        })
    }
}

/// Rejects the executing instruction with `cpi_error` when it was reached
/// through another program.
pub fn ensure_top_level<I: InstructionIntrospector>(
    introspector: &I,
    program_id: &Pubkey,
    cpi_error: FlashLoanError,
) -> Result<()> {
    let stack_height = introspector.stack_height();
    if stack_height > TRANSACTION_LEVEL_STACK_HEIGHT {
        msg!("invoked at stack height {}", stack_height);
        return Err(cpi_error.into());
    }

    let current_index = introspector.current_index()?;
    match introspector.instruction_at(current_index) {
        Some(current) if current.program_id == *program_id => Ok(()),
        _ => {
            msg!("top-level instruction {} targets another program", current_index);
            Err(cpi_error.into())
        }
    }
}

/// Scans forward from the executing instruction for the first repay on
/// `pool` by `borrower` and checks it carries `expected_amount`.
/// Returns the index of that repay.
pub fn find_scheduled_repay<I: InstructionIntrospector>(
    introspector: &I,
    program_id: &Pubkey,
    pool: &Pubkey,
    borrower: &Pubkey,
    expected_amount: u64,
) -> Result<usize> {
    let mut index = introspector.current_index()? + 1;

    while let Some(ix) = introspector.instruction_at(index) {
        if let Some(repay) = ScheduledRepay::decode(&ix, program_id) {
            if repay.pool == *pool && repay.user == *borrower {
                if repay.amount != expected_amount {
                    msg!(
                        "repay at {} carries {}, expected {}",
                        index,
                        repay.amount,
                        expected_amount
                    );
                    return err!(FlashLoanError::AmountMismatch);
                }
                return Ok(index);
            }
        }
        index += 1;
    }

    err!(FlashLoanError::NoRepay)
}
