use anchor_lang::prelude::*;

pub mod constants;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod fee;
pub mod instructions;
pub mod introspection;
pub mod pda;
pub mod receipt;
pub mod state;
pub mod token;

use instructions::*;

declare_id!("6XtVQ4HxgwfdD54df3vxMPD9ddcUumf6hKWpjxdEtXQh");

#[program]
pub mod flash_pool {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize::handle_initialize(ctx)
    }

    pub fn add_pool(ctx: Context<AddPool>) -> Result<()> {
        instructions::add_pool::handle_add_pool(ctx)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handle_deposit(ctx, amount)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handle_withdraw(ctx, amount)
    }

    pub fn borrow(ctx: Context<Borrow>, amount: u64) -> Result<()> {
        instructions::flash_loan::borrow_handler(ctx, amount)
    }

    pub fn repay(ctx: Context<Repay>, amount: u64) -> Result<()> {
        instructions::flash_loan::repay_handler(ctx, amount)
    }
}
