//! Migration 5: hand every admin right to the timelock
//!
//! The deployer still holds the admin roles while this runs, so every call
//! here is sent directly rather than through the admin route. A rerun after a
//! partial failure finds the timelock recorded and must not route through it.

use alloy::{
    primitives::{Address, U256},
    sol_types::{SolCall, SolValue},
};
use tracing::info;

use crate::{
    config::GameConfig,
    context::DeployContext,
    errors::ScriptError,
    solidity::{IAccessControlled, IProxyAdmin},
    types::{GameContract, Role},
};

pub(super) async fn run(ctx: &mut DeployContext, config: &GameConfig) -> Result<(), ScriptError> {
    let deployer = ctx.client.sender;
    let settings = &config.timelock;

    let proposers = if settings.proposers.is_empty() {
        vec![deployer]
    } else {
        settings.proposers.clone()
    };
    // The zero address as executor lets anyone execute a ready operation
    let executors = if settings.executors.is_empty() {
        vec![Address::ZERO]
    } else {
        settings.executors.clone()
    };
    let admin = settings.admin.unwrap_or(Address::ZERO);

    let constructor_args =
        (U256::from(settings.min_delay), proposers, executors, admin).abi_encode_params();
    let timelock = ctx
        .deploy_plain(GameContract::TimelockController, constructor_args)
        .await?;

    let recorded: Vec<GameContract> = GameContract::ACCESS_CONTROLLED
        .into_iter()
        .filter(|contract| ctx.deployments.has(*contract))
        .collect();

    for contract in recorded.iter().copied() {
        if ctx.has_role(contract, Role::DefaultAdmin, timelock).await? {
            continue;
        }

        let calldata = IAccessControlled::grantRoleCall {
            role: Role::DefaultAdmin.id(),
            account: timelock,
        }
        .abi_encode();
        ctx.direct_call(contract, calldata).await?;
        info!("granted DEFAULT_ADMIN_ROLE on {contract} to the timelock");
    }

    transfer_proxy_admin(ctx, timelock).await?;

    if settings.renounce_deployer_admin {
        for contract in recorded.iter().copied() {
            if !ctx.has_role(contract, Role::DefaultAdmin, deployer).await? {
                continue;
            }

            let calldata = IAccessControlled::renounceRoleCall {
                role: Role::DefaultAdmin.id(),
                account: deployer,
            }
            .abi_encode();
            ctx.direct_call(contract, calldata).await?;
            info!("deployer renounced DEFAULT_ADMIN_ROLE on {contract}");
        }
    }

    Ok(())
}

/// Make the timelock the owner of the proxy admin
async fn transfer_proxy_admin(ctx: &DeployContext, timelock: Address) -> Result<(), ScriptError> {
    let proxy_admin = ctx.address(GameContract::ProxyAdmin)?;
    let owner = IProxyAdmin::new(proxy_admin, ctx.client.provider.clone())
        .owner()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if owner == timelock {
        info!("timelock already owns the proxy admin");
        return Ok(());
    }

    let calldata = IProxyAdmin::transferOwnershipCall { newOwner: timelock }.abi_encode();
    ctx.direct_call(GameContract::ProxyAdmin, calldata).await?;
    info!("proxy admin ownership transferred to {timelock:#x}");

    Ok(())
}
