//! Migration 1: the proxy admin, VRF, characters, the mint and the first kitchen

use alloy::{
    primitives::{Address, U256},
    sol_types::{SolCall, SolValue},
};
use tracing::info;

use crate::{
    config::GameConfig,
    context::DeployContext,
    errors::ScriptError,
    solidity::{ICharacter, IClaim, ILinkToken, IMint, IPaywall, IProperties},
    types::{GameContract, Role},
    utils::{call_request, send_tx},
};

use super::{deploy_food_token, deploy_kitchen};

/// The fast food token's ERC20 metadata
const FAST_FOOD_NAME: &str = "Fast Food";
const FAST_FOOD_SYMBOL: &str = "FFOOD";

/// The VRF coordinator and LINK token the consumers are bound to
struct VrfAddresses {
    coordinator: Address,
    link_token: Address,
}

pub(super) async fn run(ctx: &mut DeployContext, config: &GameConfig) -> Result<(), ScriptError> {
    ctx.deploy_plain(GameContract::ProxyAdmin, Vec::new()).await?;
    let vrf = resolve_vrf(ctx, config).await?;

    let properties_init = IProperties::initializeCall {
        chefProbabilities: config.properties.chef.as_array(),
        ratProbabilities: config.properties.rat.as_array(),
    }
    .abi_encode();
    let properties = ctx
        .deploy_proxied(GameContract::Properties, properties_init)
        .await?;

    let character_init = ICharacter::initializeCall { properties }.abi_encode();
    let character = ctx
        .deploy_proxied(GameContract::Character, character_init)
        .await?;

    let paywall_init = IPaywall::initializeCall {
        mintPrice: config.paywall.mint_price,
        onlyWhitelist: config.paywall.only_whitelist,
    }
    .abi_encode();
    let paywall = ctx
        .deploy_proxied(GameContract::Paywall, paywall_init)
        .await?;

    let mint_init = IMint::initializeCall {
        vrfCoordinator: vrf.coordinator,
        link: vrf.link_token,
        keyHash: config.vrf.key_hash,
        fee: config.vrf.fee,
        character,
        paywall,
        maxSupply: U256::from(config.mint.max_supply),
        maxMintsPerTx: config.mint.max_mints_per_tx,
    }
    .abi_encode();
    let mint = ctx.deploy_proxied(GameContract::Mint, mint_init).await?;

    let claim_init = IClaim::initializeCall {
        vrfCoordinator: vrf.coordinator,
        link: vrf.link_token,
        keyHash: config.vrf.key_hash,
        fee: config.vrf.fee,
        character,
    }
    .abi_encode();
    let claim = ctx.deploy_proxied(GameContract::Claim, claim_init).await?;

    ctx.grant_role(GameContract::Character, Role::Controller, mint)
        .await?;
    ctx.grant_role(GameContract::Character, Role::Controller, claim)
        .await?;
    // Free mints are consumed by the mint
    ctx.grant_role(GameContract::Paywall, Role::Controller, mint)
        .await?;

    deploy_food_token(
        ctx,
        GameContract::FastFood,
        FAST_FOOD_NAME,
        FAST_FOOD_SYMBOL,
        config.kitchens.mc_stake.food_token_max_supply,
    )
    .await?;
    deploy_kitchen(
        ctx,
        GameContract::McStake,
        GameContract::FastFood,
        &config.kitchens.mc_stake,
    )
    .await?;

    if ctx.deployments.has(GameContract::LinkToken) {
        fund_with_link(ctx, vrf.link_token, mint, config.dev_link_funding).await?;
        fund_with_link(ctx, vrf.link_token, claim, config.dev_link_funding).await?;
    }

    Ok(())
}

/// The configured VRF addresses, deploying mocks for any missing on development
async fn resolve_vrf(ctx: &mut DeployContext, config: &GameConfig) -> Result<VrfAddresses, ScriptError> {
    let network = config.network;
    let missing = || {
        ScriptError::InvalidConfig(format!(
            "vrf.coordinator and vrf.link_token are required on {network}"
        ))
    };

    if !network.is_development() {
        return Ok(VrfAddresses {
            coordinator: config.vrf.coordinator.ok_or_else(missing)?,
            link_token: config.vrf.link_token.ok_or_else(missing)?,
        });
    }

    let link_token = match config.vrf.link_token {
        Some(address) => address,
        None => ctx.deploy_plain(GameContract::LinkToken, Vec::new()).await?,
    };
    let coordinator = match config.vrf.coordinator {
        Some(address) => address,
        None => {
            ctx.deploy_plain(GameContract::VrfCoordinatorMock, link_token.abi_encode())
                .await?
        }
    };

    Ok(VrfAddresses {
        coordinator,
        link_token,
    })
}

/// Top up a VRF consumer's LINK balance to `amount`
async fn fund_with_link(
    ctx: &DeployContext,
    link_token: Address,
    consumer: Address,
    amount: U256,
) -> Result<(), ScriptError> {
    let balance = ILinkToken::new(link_token, ctx.client.provider.clone())
        .balanceOf(consumer)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if balance >= amount {
        info!("{consumer:#x} already holds {balance} LINK wei");
        return Ok(());
    }

    let calldata = ILinkToken::transferCall {
        to: consumer,
        value: amount - balance,
    }
    .abi_encode();
    send_tx(&ctx.client, call_request(link_token, calldata, U256::ZERO)).await?;
    info!("funded {consumer:#x} with {} LINK wei", amount - balance);

    Ok(())
}
