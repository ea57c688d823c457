use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::FlashLoanError;
use crate::events::RegistryInitialized;
use crate::state::Registry;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init_if_needed,
        seeds = [REGISTRY_SEED],
        bump,
        payer = authority,
        space = Registry::SIZE,
    )]
    pub registry: Account<'info, Registry>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn validate_initialize(registry: &Registry) -> Result<()> {
    require!(
        !registry.is_initialized(),
        FlashLoanError::AlreadyInitialized
    );
    Ok(())
}

pub fn handle_initialize(ctx: Context<Initialize>) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    validate_initialize(registry)?;

    registry.authority = ctx.accounts.authority.key();
    registry.bump = ctx.bumps.registry;
    registry._reserved = [0u8; 32];

    emit!(RegistryInitialized {
        registry: registry.key(),
        authority: registry.authority,
    });

    Ok(())
}
