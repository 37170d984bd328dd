//! Versioned migrations
//!
//! Each migration runs at most once per deployment; the ID of the last one to
//! complete is kept in the deployments file. Within a migration every deploy
//! is skipped if already recorded and every role grant is skipped if already
//! held, so a migration that failed halfway can simply be run again.

mod core_contracts;
mod food;
mod gym;
mod paywall;
mod timelock;

use std::fmt::{self, Display};

use alloy::{
    primitives::{Address, I256, U256},
    sol_types::SolCall,
};
use tracing::info;

use crate::{
    config::{GameConfig, KitchenConfig},
    context::DeployContext,
    errors::ScriptError,
    solidity::{IFoodToken, IKitchen},
    types::{GameContract, Role},
};

/// The migrations, in the order they run
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Migration {
    /// Proxy admin, VRF, characters, fast food and McStake
    Core = 1,
    /// The gym
    Gym = 2,
    /// Casual food and TheStakehouse
    CasualFood = 3,
    /// Gourmet food and LeStake
    GourmetFood = 4,
    /// Hand admin rights to the timelock
    Timelock = 5,
    /// Mint pricing and whitelist, through the timelock
    PaywallPricing = 6,
}

impl Migration {
    /// Every migration in ascending order
    pub const ALL: [Migration; 6] = [
        Migration::Core,
        Migration::Gym,
        Migration::CasualFood,
        Migration::GourmetFood,
        Migration::Timelock,
        Migration::PaywallPricing,
    ];

    /// The migration's ID
    pub fn id(&self) -> u32 {
        *self as u32
    }

    /// The migration's name
    pub fn name(&self) -> &'static str {
        match self {
            Migration::Core => "core",
            Migration::Gym => "gym",
            Migration::CasualFood => "casual-food",
            Migration::GourmetFood => "gourmet-food",
            Migration::Timelock => "timelock",
            Migration::PaywallPricing => "paywall-pricing",
        }
    }

    /// The migrations after `last_completed`, up to and including `to`
    pub fn pending(last_completed: u32, to: Option<u32>) -> Vec<Migration> {
        let to = to.unwrap_or(u32::MAX);
        Self::ALL
            .into_iter()
            .filter(|m| m.id() > last_completed && m.id() <= to)
            .collect()
    }

    /// Run the migration
    pub async fn run(self, ctx: &mut DeployContext, config: &GameConfig) -> Result<(), ScriptError> {
        match self {
            Migration::Core => core_contracts::run(ctx, config).await,
            Migration::Gym => gym::run(ctx, config).await,
            Migration::CasualFood => food::run_casual_food(ctx, config).await,
            Migration::GourmetFood => food::run_gourmet_food(ctx, config).await,
            Migration::Timelock => timelock::run(ctx, config).await,
            Migration::PaywallPricing => paywall::run(ctx, config).await,
        }
    }
}

impl Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id(), self.name())
    }
}

/// Run every pending migration up to `to`, recording each as it completes
///
/// With `dry_run` the pending migrations are only listed
pub async fn migrate(
    ctx: &mut DeployContext,
    config: &GameConfig,
    to: Option<u32>,
    dry_run: bool,
) -> Result<Vec<Migration>, ScriptError> {
    let pending = Migration::pending(ctx.deployments.last_migration, to);
    if pending.is_empty() {
        info!(
            "no pending migrations, last completed: {}",
            ctx.deployments.last_migration
        );
        return Ok(pending);
    }

    // Fail before sending anything rather than after scheduling on the timelock
    let reaches_timelock = ctx.deployments.has(GameContract::TimelockController)
        || pending.iter().any(|m| m.id() > Migration::Timelock.id());
    if !dry_run && reaches_timelock {
        ctx.timelock_settings
            .wait
            .check_supported(ctx.client.chain_id)?;
    }

    for migration in pending.iter().copied() {
        if dry_run {
            info!("would run migration {migration}");
            continue;
        }

        info!("running migration {migration}");
        migration.run(ctx, config).await?;

        ctx.deployments.last_migration = migration.id();
        ctx.save()?;
        ctx.refresh_route();
        info!("completed migration {migration}");
    }

    Ok(pending)
}

// -------------------
// | Shared wiring   |
// -------------------

/// Deploy a capped food token
async fn deploy_food_token(
    ctx: &mut DeployContext,
    token: GameContract,
    name: &str,
    symbol: &str,
    max_supply: U256,
) -> Result<Address, ScriptError> {
    let init = IFoodToken::initializeCall {
        name: name.to_string(),
        symbol: symbol.to_string(),
        maxSupply: max_supply,
    }
    .abi_encode();

    ctx.deploy_proxied(token, init).await
}

/// Deploy a food kitchen minting `token`
async fn deploy_kitchen(
    ctx: &mut DeployContext,
    kitchen: GameContract,
    token: GameContract,
    config: &KitchenConfig,
) -> Result<Address, ScriptError> {
    let rat_efficiency_offset = I256::try_from(config.rat_efficiency_offset)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    let init = IKitchen::initializeCall {
        character: ctx.address(GameContract::Character)?,
        claim: ctx.address(GameContract::Claim)?,
        foodToken: ctx.address(token)?,
        foodTokenMaxSupply: config.food_token_max_supply,
        dailyChefEarnings: config.daily_chef_earnings,
        ratTheftPercentage: U256::from(config.rat_theft_percentage),
        vestingPeriod: U256::from(config.vesting_period),
        accrualPeriod: U256::from(config.accrual_period),
        chefEfficiencyMultiplier: U256::from(config.chef_efficiency_multiplier),
        ratEfficiencyMultiplier: U256::from(config.rat_efficiency_multiplier),
        ratEfficiencyOffset: rat_efficiency_offset,
        maxClaimsPerTx: U256::from(config.max_claims_per_tx),
    }
    .abi_encode();

    let address = ctx.deploy_proxied(kitchen, init).await?;
    ctx.grant_role(token, Role::Controller, address).await?;
    wire_venue(ctx, kitchen).await?;

    Ok(address)
}

/// Let a venue move characters and request claims
async fn wire_venue(ctx: &DeployContext, venue: GameContract) -> Result<(), ScriptError> {
    let address = ctx.address(venue)?;
    ctx.grant_role(GameContract::Character, Role::Venue, address)
        .await?;
    ctx.grant_role(GameContract::Claim, Role::Venue, address)
        .await
}
