//! Tests for the timelock guarding privileged calls

use std::time::Duration;

use alloy::{
    primitives::{Address, Bytes, B256, U256},
    providers::Provider,
    sol_types::SolCall,
};
use eyre::{bail, Result};
use kitchen_scripts::{
    errors::ScriptError,
    solidity::{IPaywall, ITimelockController},
    timelock::{
        random_salt, BatchOperation, Operation, OperationState, Proposal, Timelock, TimelockOp,
        WaitStrategy,
    },
    types::GameContract,
    utils::advance_time,
};

use crate::{integration_test, test_args::TestArgs, util::reverts};

// -----------
// | Helpers |
// -----------

/// The test timelock, waiting on operations with the given strategy
fn timelock_with(args: &TestArgs, wait: WaitStrategy) -> Result<Timelock> {
    let mut settings = args.context().timelock_settings;
    settings.wait = wait;
    Ok(settings.timelock(args.address(GameContract::TimelockController)?))
}

/// A paywall call re-setting the current mint price, so executing it changes nothing
async fn reset_mint_price(args: &TestArgs) -> Result<(Address, Bytes)> {
    let paywall = args.address(GameContract::Paywall)?;
    let price = IPaywall::new(paywall, args.provider())
        .mintPrice()
        .call()
        .await?;

    Ok((paywall, IPaywall::setMintPriceCall { price }.abi_encode().into()))
}

/// A fresh single operation re-setting the mint price
async fn reset_mint_price_op(args: &TestArgs) -> Result<TimelockOp> {
    let (paywall, calldata) = reset_mint_price(args).await?;
    Ok(TimelockOp::Single(Operation::new(paywall, calldata, random_salt())))
}

/// Check that scheduling was deferred for the given operation
fn expect_pending(result: Result<(), ScriptError>, id: B256) -> Result<()> {
    match result {
        Err(ScriptError::OperationPending(pending)) if pending == id => Ok(()),
        other => bail!("expected {id:#x} to be pending, got {other:?}"),
    }
}

// ---------
// | Tests |
// ---------

/// Tests that a scheduled operation cannot run before its delay has passed
#[allow(non_snake_case)]
async fn test_timelock__refuses_early_execution(args: TestArgs) -> Result<()> {
    let timelock = timelock_with(&args, WaitStrategy::AdvanceTime)?;
    let min_delay = timelock.min_delay(&args.client).await?;
    eyre::ensure!(min_delay > 0, "the timelock has no delay");

    let op = reset_mint_price_op(&args).await?;
    let proposal = Proposal::new("re-set mint price", timelock.address, op, min_delay);
    timelock.schedule(&args.client, &proposal).await?;

    let state = timelock.state(&args.client, proposal.id).await?;
    eyre::ensure!(state == OperationState::Waiting, "scheduled operation is {state:?}");
    eyre::ensure!(
        reverts(&args, timelock.address, proposal.execute_calldata.clone(), U256::ZERO).await,
        "operation executed before its delay"
    );

    advance_time(&args.client, min_delay).await?;
    timelock.execute(&args.client, &proposal).await?;

    let state = timelock.state(&args.client, proposal.id).await?;
    eyre::ensure!(state == OperationState::Done, "executed operation is {state:?}");
    Ok(())
}
integration_test!(test_timelock__refuses_early_execution);

/// Tests that locally computed operation IDs match the timelock's own hashing
#[allow(non_snake_case)]
async fn test_timelock__id_matches_hash_operation(args: TestArgs) -> Result<()> {
    let timelock = ITimelockController::new(
        args.address(GameContract::TimelockController)?,
        args.provider(),
    );
    let (paywall, calldata) = reset_mint_price(&args).await?;

    let op = Operation {
        target: paywall,
        value: U256::from(7),
        data: calldata.clone(),
        predecessor: B256::repeat_byte(1),
        salt: random_salt(),
    };
    let hashed = timelock
        .hashOperation(op.target, op.value, op.data.clone(), op.predecessor, op.salt)
        .call()
        .await?;
    eyre::ensure!(hashed == op.id(), "operation id {:#x}, timelock hashed {hashed:#x}", op.id());

    let mint = args.address(GameContract::Mint)?;
    let batch = BatchOperation::new(
        vec![(paywall, calldata), (mint, Bytes::from(vec![0xab]))],
        random_salt(),
    );
    let hashed = timelock
        .hashOperationBatch(
            batch.targets.clone(),
            batch.values.clone(),
            batch.payloads.clone(),
            batch.predecessor,
            batch.salt,
        )
        .call()
        .await?;
    eyre::ensure!(hashed == batch.id(), "batch id {:#x}, timelock hashed {hashed:#x}", batch.id());

    Ok(())
}
integration_test!(test_timelock__id_matches_hash_operation);

/// Tests that a deferred operation is written out and can be finished from
/// its proposal file, after which rerunning it sends nothing
#[allow(non_snake_case)]
async fn test_timelock__defer_then_execute(args: TestArgs) -> Result<()> {
    let deferring = timelock_with(&args, WaitStrategy::Defer)?;
    let op = reset_mint_price_op(&args).await?;
    let id = op.id();

    let result = deferring
        .schedule_and_execute(&args.client, "deferred re-set mint price", op.clone())
        .await;
    expect_pending(result, id)?;

    let state = deferring.state(&args.client, id).await?;
    eyre::ensure!(state == OperationState::Waiting, "deferred operation is {state:?}");

    // Finish from the written proposal, as `timelock execute` would
    let path = deferring.proposals_dir.join(format!("{id:#x}.json"));
    let proposal = Proposal::load(&path)?;
    eyre::ensure!(proposal.id == id, "proposal file holds {:#x}", proposal.id);

    let advancing = timelock_with(&args, WaitStrategy::AdvanceTime)?;
    advancing.finish(&args.client, &proposal).await?;
    let state = advancing.state(&args.client, id).await?;
    eyre::ensure!(state == OperationState::Done, "finished operation is {state:?}");

    let nonce_before = args.provider().get_transaction_count(args.sender()).await?;
    advancing
        .schedule_and_execute(&args.client, "deferred re-set mint price", op)
        .await?;
    let nonce_after = args.provider().get_transaction_count(args.sender()).await?;
    eyre::ensure!(
        nonce_before == nonce_after,
        "rerunning an executed operation sent {} transactions",
        nonce_after - nonce_before
    );

    Ok(())
}
integration_test!(test_timelock__defer_then_execute);

/// Tests that an operation scheduled earlier is resumed rather than scheduled again
#[allow(non_snake_case)]
async fn test_timelock__resumes_scheduled_operation(args: TestArgs) -> Result<()> {
    let timelock = timelock_with(&args, WaitStrategy::AdvanceTime)?;
    let min_delay = timelock.min_delay(&args.client).await?;

    let op = reset_mint_price_op(&args).await?;
    let proposal = Proposal::new("re-set mint price", timelock.address, op.clone(), min_delay);
    timelock.schedule(&args.client, &proposal).await?;

    // Scheduling the same operation twice reverts, so this must skip straight to waiting
    timelock
        .schedule_and_execute(&args.client, "re-set mint price", op)
        .await?;

    let state = timelock.state(&args.client, proposal.id).await?;
    eyre::ensure!(state == OperationState::Done, "resumed operation is {state:?}");
    Ok(())
}
integration_test!(test_timelock__resumes_scheduled_operation);

/// Tests that polling gives up by deferring, and that a cancelled operation
/// cannot be finished
#[allow(non_snake_case)]
async fn test_timelock__poll_timeout_then_cancel(args: TestArgs) -> Result<()> {
    let polling = timelock_with(
        &args,
        WaitStrategy::Poll {
            interval: Duration::from_millis(100),
            timeout: Duration::ZERO,
        },
    )?;
    let op = reset_mint_price_op(&args).await?;
    let id = op.id();

    let result = polling
        .schedule_and_execute(&args.client, "polled re-set mint price", op)
        .await;
    expect_pending(result, id)?;
    let proposal = Proposal::load(&polling.proposals_dir.join(format!("{id:#x}.json")))?;

    polling.cancel(&args.client, id).await?;
    let state = polling.state(&args.client, id).await?;
    eyre::ensure!(state == OperationState::Unset, "cancelled operation is {state:?}");

    let advancing = timelock_with(&args, WaitStrategy::AdvanceTime)?;
    match advancing.finish(&args.client, &proposal).await {
        Err(ScriptError::OperationState(_)) => Ok(()),
        other => bail!("finishing a cancelled operation returned {other:?}"),
    }
}
integration_test!(test_timelock__poll_timeout_then_cancel);
