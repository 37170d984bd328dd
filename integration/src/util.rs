//! Helpers shared by the integration tests

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, B256, U256},
    providers::Provider,
    rpc::types::TransactionReceipt,
    sol_types::{SolCall, SolEvent},
};
use eyre::{eyre, Result};
use kitchen_scripts::{
    solidity::{ICharacter, IMint, IPaywall, IVrfCoordinatorMock},
    types::GameContract,
    utils::{call_request, send_tx},
};

use crate::test_args::TestArgs;

// ------------
// | Reverts |
// ------------

/// Simulate a call from the test account, returning whether it reverts
///
/// The call is not sent, so an expected revert leaves no trace on chain
pub async fn reverts(args: &TestArgs, target: Address, calldata: impl Into<Bytes>, value: U256) -> bool {
    let tx = call_request(target, calldata, value).with_from(args.sender());
    args.client.provider.call(tx).await.is_err()
}

// -----------
// | Minting |
// -----------

/// The price of minting `amount` characters
pub async fn mint_cost(args: &TestArgs, amount: u8) -> Result<U256> {
    let paywall = IPaywall::new(args.address(GameContract::Paywall)?, args.provider());
    let price = paywall.mintPrice().call().await?;
    Ok(price * U256::from(amount))
}

/// Calldata requesting a mint of `amount` characters
pub fn request_mint_calldata(amount: u8) -> Vec<u8> {
    IMint::requestMintCall { amount }.abi_encode()
}

/// Request a mint and return the VRF request ID
pub async fn request_mint(args: &TestArgs, amount: u8) -> Result<B256> {
    let mint = args.address(GameContract::Mint)?;
    let value = mint_cost(args, amount).await?;

    let receipt = send_tx(&args.client, call_request(mint, request_mint_calldata(amount), value)).await?;
    randomness_request(&receipt, mint)
}

/// Deliver randomness for a request through the coordinator mock, returning the receipt
pub async fn fulfill(args: &TestArgs, consumer: GameContract, request_id: B256) -> Result<TransactionReceipt> {
    let coordinator = args.address(GameContract::VrfCoordinatorMock)?;
    let calldata = IVrfCoordinatorMock::callBackWithRandomnessCall {
        requestId: request_id,
        randomness: U256::from_be_bytes(rand_bytes()),
        consumerContract: args.address(consumer)?,
    }
    .abi_encode();

    Ok(send_tx(&args.client, call_request(coordinator, calldata, U256::ZERO)).await?)
}

/// Mint `amount` characters to the test account, returning their token IDs
pub async fn mint_characters(args: &TestArgs, amount: u8) -> Result<Vec<U256>> {
    let request_id = request_mint(args, amount).await?;
    let receipt = fulfill(args, GameContract::Mint, request_id).await?;

    let character = args.address(GameContract::Character)?;
    let token_ids = minted_token_ids(&receipt, character, args.sender());
    eyre::ensure!(
        token_ids.len() == amount as usize,
        "expected {amount} characters, {} were minted",
        token_ids.len()
    );

    Ok(token_ids)
}

/// The number of characters the account holds
pub async fn character_balance(args: &TestArgs, account: Address) -> Result<U256> {
    let character = ICharacter::new(args.address(GameContract::Character)?, args.provider());
    Ok(character.balanceOf(account).call().await?)
}

// --------
// | Logs |
// --------

/// The request ID of the `RandomnessRequested` event `consumer` emitted
pub fn randomness_request(receipt: &TransactionReceipt, consumer: Address) -> Result<B256> {
    receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == consumer)
        .find_map(|log| log.log_decode::<IMint::RandomnessRequested>().ok())
        .map(|log| log.inner.data.requestId)
        .ok_or_else(|| eyre!("no RandomnessRequested event from {consumer:#x}"))
}

/// The token IDs of characters minted to `owner` in the receipt
pub fn minted_token_ids(receipt: &TransactionReceipt, character: Address, owner: Address) -> Vec<U256> {
    receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == character)
        .filter(|log| log.topic0() == Some(&ICharacter::Transfer::SIGNATURE_HASH))
        .filter_map(|log| log.log_decode::<ICharacter::Transfer>().ok())
        .map(|log| log.inner.data)
        .filter(|transfer| transfer.from == Address::ZERO && transfer.to == owner)
        .map(|transfer| transfer.tokenId)
        .collect()
}

/// Random bytes for VRF fulfilment
fn rand_bytes() -> [u8; 32] {
    B256::random().0
}
