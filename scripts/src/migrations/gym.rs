//! Migration 2: the gym

use alloy::{primitives::U256, sol_types::SolCall};

use crate::{
    config::GameConfig, context::DeployContext, errors::ScriptError, solidity::IGym,
    types::GameContract,
};

use super::wire_venue;

pub(super) async fn run(ctx: &mut DeployContext, config: &GameConfig) -> Result<(), ScriptError> {
    let init = IGym::initializeCall {
        character: ctx.address(GameContract::Character)?,
        claim: ctx.address(GameContract::Claim)?,
        dailyToleranceGain: U256::from(config.gym.daily_tolerance_gain),
        vestingPeriod: U256::from(config.gym.vesting_period),
        accrualPeriod: U256::from(config.gym.accrual_period),
    }
    .abi_encode();

    ctx.deploy_proxied(GameContract::Gym, init).await?;
    wire_venue(ctx, GameContract::Gym).await
}
