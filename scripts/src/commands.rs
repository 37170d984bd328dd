//! Implementations of the various deploy and admin scripts

use alloy::{
    primitives::{Address, U256},
    sol_types::SolCall,
};
use clap::ValueEnum;
use itertools::Itertools;
use tracing::{info, warn};

use crate::{
    admin::SaltPolicy,
    artifacts::ArtifactStore,
    cli::{
        AccountsArgs, BalanceArgs, CharacterArgs, ContractArgs, ExecuteArgs, FulfillRandomnessArgs,
        GenConfigArgs, GlobalArgs, MigrateArgs, OperationArgs, ProposeArgs, RoleArgs,
        SetMaxSupplyArgs, SetMintPriceArgs, ToggleWhitelistArgs, UpgradeArgs, WhitelistArgs,
    },
    config::GameConfig,
    context::DeployContext,
    deployments::Deployments,
    errors::ScriptError,
    migrations,
    proxy::{admin_of, implementation_of},
    solidity::{IAccessControlled, ICharacter, IFoodToken, IMint, IPaywall, IVrfCoordinatorMock},
    timelock::{salt_for, Operation, OperationState, Proposal, Timelock, TimelockOp},
    types::{GameContract, Network},
    utils::{parse_address, parse_b256, parse_hex_bytes, parse_u256, setup_client},
};

// -----------
// | Helpers |
// -----------

/// Connect to the network and load its deployment record
async fn connect(global: &GlobalArgs) -> Result<DeployContext, ScriptError> {
    let client = setup_client(&global.priv_key, &global.rpc_url).await?;
    let network = Network::from_chain_id(client.chain_id)?;
    let deployments = Deployments::load_or_default(&global.deployments, network, client.chain_id)?;

    Ok(DeployContext::new(
        client,
        deployments,
        global.deployments.clone(),
        ArtifactStore::new(global.artifacts.clone()),
        global.timelock_settings(),
    ))
}

/// The timelock recorded in the deployments file
fn recorded_timelock(ctx: &DeployContext) -> Result<Timelock, ScriptError> {
    let address = ctx.address(GameContract::TimelockController)?;
    Ok(ctx.timelock_settings.timelock(address))
}

/// Fail unless the contract has `AccessControl` roles
fn require_access_controlled(contract: GameContract) -> Result<(), ScriptError> {
    if GameContract::ACCESS_CONTROLLED.contains(&contract)
        || contract == GameContract::TimelockController
    {
        return Ok(());
    }

    Err(ScriptError::CalldataConstruction(format!(
        "{contract} has no roles"
    )))
}

/// Fail unless the contract can be paused
fn require_pausable(contract: GameContract) -> Result<(), ScriptError> {
    if GameContract::ACCESS_CONTROLLED.contains(&contract) {
        return Ok(());
    }

    Err(ScriptError::CalldataConstruction(format!(
        "{contract} cannot be paused"
    )))
}

/// Parse a list of hex addresses
fn parse_accounts(accounts: &[String]) -> Result<Vec<Address>, ScriptError> {
    accounts.iter().map(|a| parse_address(a)).collect()
}

/// Render a list of addresses for a description
fn fmt_accounts(accounts: &[Address]) -> String {
    accounts.iter().map(|a| format!("{a:#x}")).join(",")
}

// ----------------------
// | Deploy and migrate |
// ----------------------

pub fn gen_config(args: GenConfigArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let path = args.out.unwrap_or_else(|| global.config.clone());
    if path.exists() && !args.force {
        return Err(ScriptError::WriteFile(format!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        )));
    }

    let config = GameConfig::preset(args.network);
    if let Err(e) = config.validate() {
        warn!("{e}; edit {} before migrating", path.display());
    }

    config.write(&path)?;
    info!("{} config written to {}", args.network, path.display());
    Ok(())
}

pub async fn migrate(args: MigrateArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let mut ctx = connect(global).await?;
    // Reruns must find the operations an interrupted run scheduled
    ctx.timelock_settings.salts = SaltPolicy::Deterministic;

    let config = GameConfig::load(&global.config)?;
    if !config.network.accepts_chain_id(ctx.client.chain_id) {
        return Err(ScriptError::ChainMismatch(format!(
            "{} is a {} config, connected to chain {}",
            global.config.display(),
            config.network,
            ctx.client.chain_id
        )));
    }

    let pending = migrations::migrate(&mut ctx, &config, args.to, args.dry_run).await?;
    if args.dry_run {
        for migration in pending {
            println!("pending: {migration}");
        }
    }

    Ok(())
}

pub async fn status(global: &GlobalArgs) -> Result<(), ScriptError> {
    let mut ctx = connect(global).await?;
    println!(
        "network: {}, chain id: {}, last migration: {}",
        ctx.deployments.network, ctx.deployments.chain_id, ctx.deployments.last_migration
    );

    let proxy_admin = ctx.deployments.try_address(GameContract::ProxyAdmin);
    let mut refreshed = false;
    for contract in GameContract::value_variants().iter().copied() {
        let Some(address) = ctx.deployments.try_address(contract) else {
            continue;
        };
        if !contract.is_proxied() {
            println!("{:>22}: {address:#x}", contract.to_string());
            continue;
        }

        // A deferred upgrade executed later is only visible on chain
        let implementation = implementation_of(&ctx.client, address).await?;
        if ctx.deployments.implementation(contract) != Some(implementation) {
            info!("{contract} implementation changed to {implementation:#x}");
            ctx.deployments.set_implementation(contract, implementation);
            refreshed = true;
        }

        let admin = admin_of(&ctx.client, address).await?;
        if Some(admin) != proxy_admin {
            warn!("{contract} proxy is administered by {admin:#x}, not the recorded proxy admin");
        }

        println!(
            "{:>22}: {address:#x} (implementation {implementation:#x})",
            contract.to_string()
        );
    }

    if let Ok(timelock) = recorded_timelock(&ctx) {
        let min_delay = timelock.min_delay(&ctx.client).await?;
        println!("timelock minimum delay: {min_delay}s");
    }

    if refreshed {
        ctx.save()?;
    }
    Ok(())
}

pub async fn upgrade(args: UpgradeArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let mut ctx = connect(global).await?;
    let calldata = args
        .calldata
        .as_deref()
        .map(parse_hex_bytes)
        .transpose()?;

    let implementation = ctx.upgrade(args.contract, calldata).await?;
    info!("{} upgraded to {implementation:#x}", args.contract);
    Ok(())
}

// ------------------
// | Administration |
// ------------------

pub async fn pause(args: ContractArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    require_pausable(args.contract)?;
    let ctx = connect(global).await?;

    let calldata = IAccessControlled::pauseCall {}.abi_encode();
    ctx.admin_call(args.contract, calldata, &format!("pause {}", args.contract))
        .await
}

pub async fn unpause(args: ContractArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    require_pausable(args.contract)?;
    let ctx = connect(global).await?;

    let calldata = IAccessControlled::unpauseCall {}.abi_encode();
    ctx.admin_call(args.contract, calldata, &format!("unpause {}", args.contract))
        .await
}

pub async fn grant_role(args: RoleArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    require_access_controlled(args.contract)?;
    let account = parse_address(&args.account)?;
    let ctx = connect(global).await?;

    ctx.grant_role(args.contract, args.role, account).await
}

pub async fn revoke_role(args: RoleArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    require_access_controlled(args.contract)?;
    let account = parse_address(&args.account)?;
    let ctx = connect(global).await?;

    ctx.revoke_role(args.contract, args.role, account).await
}

pub async fn set_mint_price(args: SetMintPriceArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let price = parse_u256(&args.price)?;
    let ctx = connect(global).await?;

    let calldata = IPaywall::setMintPriceCall { price }.abi_encode();
    ctx.admin_call(
        GameContract::Paywall,
        calldata,
        &format!("set mint price to {price} wei"),
    )
    .await
}

pub async fn set_max_supply(args: SetMaxSupplyArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let ctx = connect(global).await?;

    let calldata = IMint::setMaxSupplyCall {
        maxSupply: U256::from(args.max_supply),
    }
    .abi_encode();
    ctx.admin_call(
        GameContract::Mint,
        calldata,
        &format!("set max supply to {}", args.max_supply),
    )
    .await
}

pub async fn toggle_whitelist(
    args: ToggleWhitelistArgs,
    global: &GlobalArgs,
) -> Result<(), ScriptError> {
    let ctx = connect(global).await?;

    let calldata = IPaywall::toggleWhitelistCall {
        enabled: args.enabled,
    }
    .abi_encode();
    ctx.admin_call(
        GameContract::Paywall,
        calldata,
        &format!("set whitelist only to {}", args.enabled),
    )
    .await
}

pub async fn whitelist(args: WhitelistArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let accounts = parse_accounts(&args.accounts)?;
    let ctx = connect(global).await?;

    let description = if args.remove {
        format!("remove [{}] from the whitelist", fmt_accounts(&accounts))
    } else {
        format!("add [{}] to the whitelist", fmt_accounts(&accounts))
    };
    let calldata = if args.remove {
        IPaywall::removeFromWhitelistCall { accounts }.abi_encode()
    } else {
        IPaywall::addToWhitelistCall { accounts }.abi_encode()
    };

    ctx.admin_call(GameContract::Paywall, calldata, &description)
        .await
}

pub async fn free_mints(args: AccountsArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let accounts = parse_accounts(&args.accounts)?;
    let ctx = connect(global).await?;

    let description = format!("grant free mints to [{}]", fmt_accounts(&accounts));
    let calldata = IPaywall::addToFreeMintsCall { accounts }.abi_encode();
    ctx.admin_call(GameContract::Paywall, calldata, &description)
        .await
}

// ---------------
// | Development |
// ---------------

pub async fn fulfill_randomness(
    args: FulfillRandomnessArgs,
    global: &GlobalArgs,
) -> Result<(), ScriptError> {
    if !matches!(args.consumer, GameContract::Mint | GameContract::Claim) {
        return Err(ScriptError::CalldataConstruction(format!(
            "{} does not request randomness",
            args.consumer
        )));
    }

    let request_id = parse_b256(&args.request_id)?;
    let randomness = match args.randomness.as_deref() {
        Some(value) => parse_u256(value)?,
        None => U256::from_be_bytes(rand::random::<[u8; 32]>()),
    };

    let ctx = connect(global).await?;
    if !ctx.deployments.network.is_development() {
        return Err(ScriptError::UnsupportedNetwork(format!(
            "randomness can only be fulfilled by the coordinator mock, connected to {}",
            ctx.deployments.network
        )));
    }

    let calldata = IVrfCoordinatorMock::callBackWithRandomnessCall {
        requestId: request_id,
        randomness,
        consumerContract: ctx.address(args.consumer)?,
    }
    .abi_encode();
    ctx.direct_call(GameContract::VrfCoordinatorMock, calldata)
        .await?;

    info!("fulfilled request {request_id:#x} on {}", args.consumer);
    Ok(())
}

// -----------
// | Queries |
// -----------

pub async fn character(args: CharacterArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let ctx = connect(global).await?;
    let character = ICharacter::new(
        ctx.address(GameContract::Character)?,
        ctx.client.provider.clone(),
    );
    let token_id = U256::from(args.token_id);

    let info = character
        .getCharacter(token_id)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let owner = character
        .ownerOf(token_id)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    let kind = if info.isChef { "chef" } else { "rat" };
    println!(
        "#{}: {kind}, efficiency {}, tolerance {}, owned by {owner:#x}",
        args.token_id, info.efficiency, info.tolerance
    );
    Ok(())
}

pub async fn balance(args: BalanceArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let ctx = connect(global).await?;
    let account = match args.account.as_deref() {
        Some(account) => parse_address(account)?,
        None => ctx.client.sender,
    };

    let character = ICharacter::new(
        ctx.address(GameContract::Character)?,
        ctx.client.provider.clone(),
    );
    let count = character
        .balanceOf(account)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let count =
        u64::try_from(count).map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    let mut token_ids = Vec::with_capacity(count as usize);
    for index in 0..count {
        let token_id = character
            .tokenOfOwnerByIndex(account, U256::from(index))
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        token_ids.push(token_id);
    }
    println!("{account:#x} holds {count} characters: [{}]", token_ids.iter().join(", "));

    let food_tokens = GameContract::value_variants()
        .iter()
        .copied()
        .filter(|contract| contract.is_food_token());
    for token in food_tokens {
        let Some(address) = ctx.deployments.try_address(token) else {
            continue;
        };
        let balance = IFoodToken::new(address, ctx.client.provider.clone())
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        println!("{:>14}: {balance}", token.to_string());
    }

    Ok(())
}

// ------------
// | Timelock |
// ------------

pub async fn timelock_status(args: OperationArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let id = parse_b256(&args.id)?;
    let ctx = connect(global).await?;
    let timelock = recorded_timelock(&ctx)?;

    let state = timelock.state(&ctx.client, id).await?;
    println!("operation {id:#x}: {state:?}");
    Ok(())
}

pub async fn timelock_execute(args: ExecuteArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let proposal = Proposal::load(&args.proposal)?;
    let ctx = connect(global).await?;
    let timelock = ctx.timelock_settings.timelock(proposal.timelock);

    match timelock.state(&ctx.client, proposal.id).await? {
        OperationState::Ready => timelock.execute(&ctx.client, &proposal).await,
        OperationState::Done => {
            info!("operation {:#x} already executed", proposal.id);
            Ok(())
        }
        state => Err(ScriptError::OperationState(format!(
            "{:#x} is {state:?}, it cannot be executed yet",
            proposal.id
        ))),
    }
}

pub async fn timelock_cancel(args: OperationArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let id = parse_b256(&args.id)?;
    let ctx = connect(global).await?;
    let timelock = recorded_timelock(&ctx)?;

    timelock.cancel(&ctx.client, id).await
}

pub async fn timelock_propose(args: ProposeArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let calldata = parse_hex_bytes(&args.calldata)?;
    let ctx = connect(global).await?;
    let timelock = recorded_timelock(&ctx)?;

    let target = ctx.address(args.contract)?;
    let op = TimelockOp::Single(Operation::new(target, calldata, salt_for(&args.description)));
    let delay = timelock.delay.max(timelock.min_delay(&ctx.client).await?);
    let proposal = Proposal::new(&args.description, timelock.address, op, delay);

    let path = proposal.write_to(&timelock.proposals_dir)?;
    println!("operation {:#x} written to {}", proposal.id, path.display());
    println!(
        "schedule calldata for {:#x}: 0x{}",
        timelock.address,
        hex::encode(&proposal.schedule_calldata)
    );

    if args.schedule {
        match timelock.state(&ctx.client, proposal.id).await? {
            OperationState::Unset => timelock.schedule(&ctx.client, &proposal).await?,
            state => info!("operation {:#x} is already {state:?}", proposal.id),
        }
    }

    Ok(())
}
