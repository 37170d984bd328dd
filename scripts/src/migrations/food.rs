//! Migrations 3 and 4: the casual and gourmet food kitchens

use crate::{
    config::GameConfig, context::DeployContext, errors::ScriptError, types::GameContract,
};

use super::{deploy_food_token, deploy_kitchen};

pub(super) async fn run_casual_food(
    ctx: &mut DeployContext,
    config: &GameConfig,
) -> Result<(), ScriptError> {
    let kitchen = &config.kitchens.the_stakehouse;
    deploy_food_token(
        ctx,
        GameContract::CasualFood,
        "Casual Food",
        "CFOOD",
        kitchen.food_token_max_supply,
    )
    .await?;
    deploy_kitchen(ctx, GameContract::TheStakehouse, GameContract::CasualFood, kitchen).await?;

    Ok(())
}

pub(super) async fn run_gourmet_food(
    ctx: &mut DeployContext,
    config: &GameConfig,
) -> Result<(), ScriptError> {
    let kitchen = &config.kitchens.le_stake;
    deploy_food_token(
        ctx,
        GameContract::GourmetFood,
        "Gourmet Food",
        "GFOOD",
        kitchen.food_token_max_supply,
    )
    .await?;
    deploy_kitchen(ctx, GameContract::LeStake, GameContract::GourmetFood, kitchen).await?;

    Ok(())
}
