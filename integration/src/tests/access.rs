//! Tests for pausing, roles and the mint whitelist

use alloy::{primitives::U256, sol_types::SolCall};
use eyre::Result;
use kitchen_scripts::{
    solidity::{IAccessControlled, IFoodToken, IPaywall},
    types::{GameContract, Role},
};

use crate::{
    integration_test,
    test_args::TestArgs,
    util::{mint_cost, request_mint_calldata, reverts},
};

/// Tests that a paused mint rejects requests until unpaused
#[allow(non_snake_case)]
async fn test_pause__blocks_minting(args: TestArgs) -> Result<()> {
    let ctx = args.context();
    let mint = args.address(GameContract::Mint)?;
    let value = mint_cost(&args, 1).await?;
    let mint_contract = IAccessControlled::new(mint, args.provider());

    ctx.admin_call(
        GameContract::Mint,
        IAccessControlled::pauseCall {}.abi_encode(),
        "pause mint",
    )
    .await?;
    let paused = mint_contract.paused().call().await?;
    let paused_reverts = reverts(&args, mint, request_mint_calldata(1), value).await;

    // Unpause before checking, so a failure does not leave the mint paused
    ctx.admin_call(
        GameContract::Mint,
        IAccessControlled::unpauseCall {}.abi_encode(),
        "unpause mint",
    )
    .await?;
    let unpaused_reverts = reverts(&args, mint, request_mint_calldata(1), value).await;

    eyre::ensure!(paused, "mint not paused after pausing");
    eyre::ensure!(!mint_contract.paused().call().await?, "mint still paused after unpausing");
    eyre::ensure!(paused_reverts, "mint request succeeded while paused");
    eyre::ensure!(!unpaused_reverts, "mint request reverted after unpausing");
    Ok(())
}
integration_test!(test_pause__blocks_minting);

/// Tests that only controllers may mint fast food
#[allow(non_snake_case)]
async fn test_fast_food__mint_requires_controller(args: TestArgs) -> Result<()> {
    let ctx = args.context();
    let sender = args.sender();
    let fast_food = args.address(GameContract::FastFood)?;
    let mint_one = IFoodToken::mintCall {
        account: sender,
        amount: U256::from(1),
    }
    .abi_encode();

    eyre::ensure!(
        !ctx.has_role(GameContract::FastFood, Role::Controller, sender).await?,
        "test account is already a fast food controller"
    );
    eyre::ensure!(
        reverts(&args, fast_food, mint_one.clone(), U256::ZERO).await,
        "non-controller minted fast food"
    );

    ctx.grant_role(GameContract::FastFood, Role::Controller, sender)
        .await?;
    let controller_reverts = reverts(&args, fast_food, mint_one, U256::ZERO).await;
    ctx.revoke_role(GameContract::FastFood, Role::Controller, sender)
        .await?;

    eyre::ensure!(!controller_reverts, "controller could not mint fast food");
    Ok(())
}
integration_test!(test_fast_food__mint_requires_controller);

/// Tests that an enforced whitelist only lets whitelisted accounts mint
#[allow(non_snake_case)]
async fn test_whitelist__gates_minting(args: TestArgs) -> Result<()> {
    let ctx = args.context();
    let sender = args.sender();
    let mint = args.address(GameContract::Mint)?;
    let value = mint_cost(&args, 1).await?;

    let paywall = IPaywall::new(args.address(GameContract::Paywall)?, args.provider());
    let was_whitelist_only = paywall.onlyWhitelist().call().await?;
    let was_whitelisted = paywall.whitelist(sender).call().await?;

    let set_whitelist_only = |enabled: bool| IPaywall::toggleWhitelistCall { enabled }.abi_encode();
    let accounts = vec![sender];

    ctx.admin_call(GameContract::Paywall, set_whitelist_only(true), "whitelist only")
        .await?;
    if was_whitelisted {
        ctx.admin_call(
            GameContract::Paywall,
            IPaywall::removeFromWhitelistCall {
                accounts: accounts.clone(),
            }
            .abi_encode(),
            "remove test account from whitelist",
        )
        .await?;
    }
    let outsider_reverts = reverts(&args, mint, request_mint_calldata(1), value).await;

    ctx.admin_call(
        GameContract::Paywall,
        IPaywall::addToWhitelistCall {
            accounts: accounts.clone(),
        }
        .abi_encode(),
        "whitelist test account",
    )
    .await?;
    let whitelisted_reverts = reverts(&args, mint, request_mint_calldata(1), value).await;

    // Restore the paywall as it was
    if !was_whitelisted {
        ctx.admin_call(
            GameContract::Paywall,
            IPaywall::removeFromWhitelistCall { accounts }.abi_encode(),
            "remove test account from whitelist",
        )
        .await?;
    }
    ctx.admin_call(
        GameContract::Paywall,
        set_whitelist_only(was_whitelist_only),
        "restore whitelist only",
    )
    .await?;

    eyre::ensure!(outsider_reverts, "non-whitelisted account minted");
    eyre::ensure!(!whitelisted_reverts, "whitelisted account could not mint");
    Ok(())
}
integration_test!(test_whitelist__gates_minting);
