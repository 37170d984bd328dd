//! Tests for minting characters through the VRF

use alloy::primitives::U256;
use eyre::Result;
use kitchen_scripts::{solidity::ICharacter, types::GameContract};

use crate::{
    integration_test,
    test_args::TestArgs,
    util::{character_balance, fulfill, request_mint},
};

/// Tests that a mint request mints nothing until the randomness arrives
#[allow(non_snake_case)]
async fn test_mint__fulfilled_by_vrf(args: TestArgs) -> Result<()> {
    let balance_before = character_balance(&args, args.sender()).await?;

    let request_id = request_mint(&args, 1 /* amount */).await?;
    let balance_requested = character_balance(&args, args.sender()).await?;
    eyre::ensure!(
        balance_requested == balance_before,
        "characters minted before randomness was delivered"
    );

    fulfill(&args, GameContract::Mint, request_id).await?;
    let balance_after = character_balance(&args, args.sender()).await?;
    eyre::ensure!(
        balance_after == balance_before + U256::from(1),
        "expected one new character, balance went from {balance_before} to {balance_after}"
    );

    // The newest character belongs to the minter
    let character = ICharacter::new(args.address(GameContract::Character)?, args.provider());
    let token_id = character
        .tokenOfOwnerByIndex(args.sender(), balance_after - U256::from(1))
        .call()
        .await?;
    let owner = character.ownerOf(token_id).call().await?;
    eyre::ensure!(owner == args.sender(), "character {token_id} owned by {owner:#x}");

    Ok(())
}
integration_test!(test_mint__fulfilled_by_vrf);
