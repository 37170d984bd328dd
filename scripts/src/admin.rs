//! The route privileged calls take: straight from the deployer, or through
//! the timelock once one is deployed

use std::path::PathBuf;

use alloy::primitives::{Address, Bytes, B256, U256};
use tracing::info;

use crate::{
    deployments::Deployments,
    errors::ScriptError,
    timelock::{random_salt, salt_for, BatchOperation, Operation, Timelock, TimelockOp, WaitStrategy},
    types::GameContract,
    utils::{call_request, send_tx, Client},
};

/// How the scripts drive timelock operations, set from the command line
#[derive(Clone, Debug)]
pub struct TimelockSettings {
    /// The delay requested for new operations; the timelock's minimum applies when lower
    pub delay: u64,
    /// How to wait for scheduled operations
    pub wait: WaitStrategy,
    /// Where deferred proposals are written
    pub proposals_dir: PathBuf,
    /// How operation salts are chosen
    pub salts: SaltPolicy,
}

/// How timelock operation salts are chosen
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SaltPolicy {
    /// Derived from the description, so rerunning an action resumes its operation
    Deterministic,
    /// Random, so repeating an action makes a new operation
    Fresh,
}

impl SaltPolicy {
    /// The salt for the described action
    pub fn salt(&self, description: &str) -> B256 {
        match self {
            SaltPolicy::Deterministic => salt_for(description),
            SaltPolicy::Fresh => random_salt(),
        }
    }
}

impl TimelockSettings {
    /// The timelock at the given address driven with these settings
    pub fn timelock(&self, address: Address) -> Timelock {
        Timelock {
            address,
            delay: self.delay,
            wait: self.wait,
            proposals_dir: self.proposals_dir.clone(),
        }
    }
}

/// The path a privileged call takes
#[derive(Clone, Debug)]
pub enum AdminRoute {
    /// The deployer holds the admin roles and calls directly
    Direct,
    /// The timelock holds the admin roles
    Timelock(Timelock),
}

impl AdminRoute {
    /// Route through the timelock if the deployments record one
    pub fn from_deployments(deployments: &Deployments, settings: &TimelockSettings) -> Self {
        match deployments.try_address(GameContract::TimelockController) {
            Some(address) => AdminRoute::Timelock(settings.timelock(address)),
            None => AdminRoute::Direct,
        }
    }

    /// Make a privileged call
    ///
    /// Through the timelock, `salt` distinguishes the operation from an
    /// identical call made earlier
    pub async fn call(
        &self,
        client: &Client,
        target: Address,
        calldata: Bytes,
        description: &str,
        salt: B256,
    ) -> Result<(), ScriptError> {
        match self {
            AdminRoute::Direct => {
                send_tx(client, call_request(target, calldata, U256::ZERO)).await?;
                info!("{description}: done");
                Ok(())
            }
            AdminRoute::Timelock(timelock) => {
                let op = Operation::new(target, calldata, salt);
                timelock
                    .schedule_and_execute(client, description, TimelockOp::Single(op))
                    .await
            }
        }
    }

    /// Make several privileged calls; atomically when routed through the timelock
    pub async fn call_batch(
        &self,
        client: &Client,
        calls: Vec<(Address, Bytes)>,
        description: &str,
        salt: B256,
    ) -> Result<(), ScriptError> {
        if calls.is_empty() {
            return Ok(());
        }

        match self {
            AdminRoute::Direct => {
                for (target, calldata) in calls {
                    send_tx(client, call_request(target, calldata, U256::ZERO)).await?;
                }
                info!("{description}: done");
                Ok(())
            }
            AdminRoute::Timelock(timelock) => {
                let op = BatchOperation::new(calls, salt);
                timelock
                    .schedule_and_execute(client, description, TimelockOp::Batch(op))
                    .await
            }
        }
    }
}
