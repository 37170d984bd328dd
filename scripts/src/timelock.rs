//! Schedule-and-execute through an OpenZeppelin `TimelockController`
//!
//! A privileged call is first scheduled with a delay and executed once the
//! delay has elapsed. Operation IDs are computed locally the same way
//! `hashOperation` / `hashOperationBatch` compute them, so a proposal can be
//! checked and tracked before it is ever sent on-chain.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use alloy::{
    primitives::{keccak256, Address, Bytes, B256, U256},
    sol_types::{SolCall, SolValue},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    constants::TIMELOCK_DONE_TIMESTAMP,
    errors::ScriptError,
    proxy::decode_upgrade,
    solidity::ITimelockController,
    types::{Network, Role},
    utils::{advance_time, call_request, latest_timestamp, send_tx, Client},
};

// --------------
// | Operations |
// --------------

/// A single call scheduled through the timelock
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Operation {
    /// The contract called
    pub target: Address,
    /// The native value sent with the call
    pub value: U256,
    /// The calldata
    pub data: Bytes,
    /// An operation that must be executed first, zero for none
    pub predecessor: B256,
    /// Distinguishes otherwise identical operations
    pub salt: B256,
}

/// Several calls scheduled and executed atomically
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchOperation {
    /// The contracts called
    pub targets: Vec<Address>,
    /// The native value sent with each call
    pub values: Vec<U256>,
    /// The calldata of each call
    pub payloads: Vec<Bytes>,
    /// An operation that must be executed first, zero for none
    pub predecessor: B256,
    /// Distinguishes otherwise identical operations
    pub salt: B256,
}

/// Either kind of timelock operation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimelockOp {
    /// A single call
    Single(Operation),
    /// A batch of calls
    Batch(BatchOperation),
}

impl Operation {
    /// A zero-value call with no predecessor
    pub fn new(target: Address, data: impl Into<Bytes>, salt: B256) -> Self {
        Self {
            target,
            value: U256::ZERO,
            data: data.into(),
            predecessor: B256::ZERO,
            salt,
        }
    }

    /// `keccak256(abi.encode(target, value, data, predecessor, salt))`
    pub fn id(&self) -> B256 {
        keccak256(
            (
                self.target,
                self.value,
                self.data.clone(),
                self.predecessor,
                self.salt,
            )
                .abi_encode_params(),
        )
    }
}

impl BatchOperation {
    /// Zero-value calls with no predecessor
    pub fn new(calls: Vec<(Address, Bytes)>, salt: B256) -> Self {
        let (targets, payloads): (Vec<_>, Vec<_>) = calls.into_iter().unzip();
        Self {
            values: vec![U256::ZERO; targets.len()],
            targets,
            payloads,
            predecessor: B256::ZERO,
            salt,
        }
    }

    /// `keccak256(abi.encode(targets, values, payloads, predecessor, salt))`
    pub fn id(&self) -> B256 {
        keccak256(
            (
                self.targets.clone(),
                self.values.clone(),
                self.payloads.clone(),
                self.predecessor,
                self.salt,
            )
                .abi_encode_params(),
        )
    }
}

impl TimelockOp {
    /// The operation ID the timelock tracks this operation under
    pub fn id(&self) -> B256 {
        match self {
            TimelockOp::Single(op) => op.id(),
            TimelockOp::Batch(op) => op.id(),
        }
    }

    /// Calldata scheduling the operation on the timelock
    pub fn schedule_calldata(&self, delay: u64) -> Bytes {
        let delay = U256::from(delay);
        match self {
            TimelockOp::Single(op) => ITimelockController::scheduleCall {
                target: op.target,
                value: op.value,
                data: op.data.clone(),
                predecessor: op.predecessor,
                salt: op.salt,
                delay,
            }
            .abi_encode(),
            TimelockOp::Batch(op) => ITimelockController::scheduleBatchCall {
                targets: op.targets.clone(),
                values: op.values.clone(),
                payloads: op.payloads.clone(),
                predecessor: op.predecessor,
                salt: op.salt,
                delay,
            }
            .abi_encode(),
        }
        .into()
    }

    /// Calldata executing the operation on the timelock
    pub fn execute_calldata(&self) -> Bytes {
        match self {
            TimelockOp::Single(op) => ITimelockController::executeCall {
                target: op.target,
                value: op.value,
                payload: op.data.clone(),
                predecessor: op.predecessor,
                salt: op.salt,
            }
            .abi_encode(),
            TimelockOp::Batch(op) => ITimelockController::executeBatchCall {
                targets: op.targets.clone(),
                values: op.values.clone(),
                payloads: op.payloads.clone(),
                predecessor: op.predecessor,
                salt: op.salt,
            }
            .abi_encode(),
        }
        .into()
    }

    /// The total native value the execute call must carry
    pub fn total_value(&self) -> U256 {
        match self {
            TimelockOp::Single(op) => op.value,
            TimelockOp::Batch(op) => op.values.iter().fold(U256::ZERO, |acc, v| acc + *v),
        }
    }
}

/// A salt derived from a description, so the same administrative action
/// always maps to the same operation
pub fn salt_for(description: &str) -> B256 {
    keccak256(description)
}

/// A random salt for one-off operations
pub fn random_salt() -> B256 {
    B256::from(rand::random::<[u8; 32]>())
}

// ---------
// | State |
// ---------

/// The lifecycle of a timelock operation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperationState {
    /// Never scheduled, or cancelled
    Unset,
    /// Scheduled, delay not yet elapsed
    Waiting,
    /// Scheduled, delay elapsed
    Ready,
    /// Executed
    Done,
}

impl OperationState {
    /// Interpret the timestamp `getTimestamp` returns against the chain's clock
    pub fn from_timestamp(timestamp: U256, now: u64) -> Self {
        if timestamp.is_zero() {
            OperationState::Unset
        } else if timestamp == U256::from(TIMELOCK_DONE_TIMESTAMP) {
            OperationState::Done
        } else if timestamp > U256::from(now) {
            OperationState::Waiting
        } else {
            OperationState::Ready
        }
    }

    /// Whether the operation is scheduled and not yet executed
    pub fn is_pending(&self) -> bool {
        matches!(self, OperationState::Waiting | OperationState::Ready)
    }

    /// Where waiting on an operation in this state ends up, `None` while the
    /// delay is still running
    pub fn wait_outcome(self, id: B256) -> Result<Option<OperationState>, ScriptError> {
        match self {
            OperationState::Waiting => Ok(None),
            OperationState::Ready | OperationState::Done => Ok(Some(self)),
            OperationState::Unset => Err(ScriptError::OperationState(format!(
                "{id:#x} is not scheduled, it may have been cancelled"
            ))),
        }
    }
}

// -------------
// | Proposals |
// -------------

/// A scheduled (or to-be-scheduled) operation persisted to disk, so it can
/// be executed later or handed to a multisig proposer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Proposal {
    /// What the operation does
    pub description: String,
    /// The timelock the operation belongs to
    pub timelock: Address,
    /// The delay requested when scheduling
    pub delay: u64,
    /// The operation ID
    pub id: B256,
    /// The operation itself
    pub operation: TimelockOp,
    /// Calldata for the timelock's `schedule` / `scheduleBatch`
    pub schedule_calldata: Bytes,
    /// Calldata for the timelock's `execute` / `executeBatch`
    pub execute_calldata: Bytes,
}

impl Proposal {
    /// Build a proposal for the given operation
    pub fn new(description: &str, timelock: Address, operation: TimelockOp, delay: u64) -> Self {
        Self {
            description: description.to_string(),
            timelock,
            delay,
            id: operation.id(),
            schedule_calldata: operation.schedule_calldata(delay),
            execute_calldata: operation.execute_calldata(),
            operation,
        }
    }

    /// Write the proposal into `dir`, named after its operation ID
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ScriptError> {
        fs::create_dir_all(dir)
            .map_err(|e| ScriptError::WriteFile(format!("{}: {}", dir.display(), e)))?;

        let path = dir.join(format!("{:#x}.json", self.id));
        let contents =
            serde_json::to_string_pretty(self).map_err(|e| ScriptError::Serde(e.to_string()))?;
        fs::write(&path, contents)
            .map_err(|e| ScriptError::WriteFile(format!("{}: {}", path.display(), e)))?;

        Ok(path)
    }

    /// Read a proposal, checking that its recorded ID matches its operation
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;
        let proposal: Self =
            serde_json::from_str(&contents).map_err(|e| ScriptError::Serde(e.to_string()))?;

        if proposal.id != proposal.operation.id() {
            return Err(ScriptError::Serde(format!(
                "{}: recorded id {:#x} does not match the operation",
                path.display(),
                proposal.id
            )));
        }

        Ok(proposal)
    }

    /// Every proposal written into `dir`, none if the directory does not exist
    pub fn load_all(dir: &Path) -> Result<Vec<Self>, ScriptError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", dir.display(), e)))?;
        let mut proposals = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ScriptError::ReadFile(format!("{}: {}", dir.display(), e)))?
                .path();
            if path.extension().is_some_and(|ext| ext == "json") {
                proposals.push(Self::load(&path)?);
            }
        }

        Ok(proposals)
    }

    /// Whether this is a single `ProxyAdmin` call on `timelock` upgrading `proxy`
    pub fn upgrades_proxy(&self, timelock: Address, proxy_admin: Address, proxy: Address) -> bool {
        let TimelockOp::Single(op) = &self.operation else {
            return false;
        };

        self.timelock == timelock
            && op.target == proxy_admin
            && matches!(decode_upgrade(&op.data), Some((upgraded, _)) if upgraded == proxy)
    }
}

// -------------------------
// | Schedule and execute |
// -------------------------

/// How to get from "scheduled" to "ready"
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Advance the chain's clock past the delay, development chains only
    AdvanceTime,
    /// Sleep until the operation is ready, giving up after `timeout`
    Poll {
        /// The time between readiness checks
        interval: Duration,
        /// The longest time to wait
        timeout: Duration,
    },
    /// Persist the proposal and return, executing on a later run
    Defer,
}

impl WaitStrategy {
    /// Fail if the strategy cannot be used on the given chain
    pub fn check_supported(&self, chain_id: u64) -> Result<(), ScriptError> {
        let development = Network::from_chain_id(chain_id)
            .map(|network| network.is_development())
            .unwrap_or(false);
        if *self == WaitStrategy::AdvanceTime && !development {
            return Err(ScriptError::UnsupportedNetwork(format!(
                "`--wait advance-time` cannot advance the clock of chain {chain_id}, use `poll` or `defer`"
            )));
        }

        Ok(())
    }
}

/// A deployed `TimelockController` together with how the scripts wait on it
#[derive(Clone, Debug)]
pub struct Timelock {
    /// The timelock contract
    pub address: Address,
    /// The delay requested for new operations, raised to the timelock's minimum
    pub delay: u64,
    /// How to wait for scheduled operations
    pub wait: WaitStrategy,
    /// Where proposals are persisted
    pub proposals_dir: PathBuf,
}

impl Timelock {
    /// The timelock's minimum delay
    pub async fn min_delay(&self, client: &Client) -> Result<u64, ScriptError> {
        let timelock = ITimelockController::new(self.address, client.provider.clone());
        let min_delay = timelock
            .getMinDelay()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        u64::try_from(min_delay).map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    /// The raw timestamp the timelock records for an operation
    async fn timestamp(&self, client: &Client, id: B256) -> Result<U256, ScriptError> {
        let timelock = ITimelockController::new(self.address, client.provider.clone());
        timelock
            .getTimestamp(id)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    /// The current state of an operation
    pub async fn state(&self, client: &Client, id: B256) -> Result<OperationState, ScriptError> {
        let timestamp = self.timestamp(client, id).await?;
        let now = latest_timestamp(client).await?;
        Ok(OperationState::from_timestamp(timestamp, now))
    }

    /// Whether `account` may schedule operations
    pub async fn is_proposer(&self, client: &Client, account: Address) -> Result<bool, ScriptError> {
        let timelock = ITimelockController::new(self.address, client.provider.clone());
        timelock
            .hasRole(Role::Proposer.id(), account)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    /// Schedule the operation if needed, wait for its delay and execute it
    ///
    /// Idempotent: an operation that is already done is skipped, one that is
    /// already scheduled is not scheduled again. When the sender cannot
    /// schedule, the proposal is written out for a proposer to submit
    pub async fn schedule_and_execute(
        &self,
        client: &Client,
        description: &str,
        op: TimelockOp,
    ) -> Result<(), ScriptError> {
        let id = op.id();
        let state = self.state(client, id).await?;
        if state == OperationState::Done {
            info!("{description}: operation {id:#x} already executed");
            return Ok(());
        }
        self.wait.check_supported(client.chain_id)?;

        let delay = self.delay.max(self.min_delay(client).await?);
        let proposal = Proposal::new(description, self.address, op, delay);
        if state == OperationState::Unset {
            if !self.is_proposer(client, client.sender).await? {
                warn!(
                    "{description}: {:#x} is not a proposer, the schedule calldata must be submitted by one",
                    client.sender
                );
                return Err(self.defer(&proposal));
            }
            self.schedule(client, &proposal).await?;
        }

        self.finish(client, &proposal).await
    }

    /// Wait out a scheduled proposal's delay and execute it, unless another
    /// account already has
    pub async fn finish(&self, client: &Client, proposal: &Proposal) -> Result<(), ScriptError> {
        self.wait.check_supported(client.chain_id)?;

        match self.wait_until_ready(client, proposal).await? {
            OperationState::Done => {
                info!(
                    "{}: operation {:#x} was executed by another account",
                    proposal.description, proposal.id
                );
                Ok(())
            }
            _ => self.execute(client, proposal).await,
        }
    }

    /// Schedule a proposal; the sender must hold the proposer role
    pub async fn schedule(&self, client: &Client, proposal: &Proposal) -> Result<(), ScriptError> {
        let tx = call_request(self.address, proposal.schedule_calldata.clone(), U256::ZERO);
        send_tx(client, tx).await?;
        info!(
            "{}: scheduled operation {:#x} with a delay of {}s",
            proposal.description, proposal.id, proposal.delay
        );
        Ok(())
    }

    /// Execute a ready operation and check that the timelock marked it done
    pub async fn execute(&self, client: &Client, proposal: &Proposal) -> Result<(), ScriptError> {
        let tx = call_request(
            self.address,
            proposal.execute_calldata.clone(),
            proposal.operation.total_value(),
        );
        send_tx(client, tx).await?;

        let state = self.state(client, proposal.id).await?;
        if state != OperationState::Done {
            return Err(ScriptError::OperationState(format!(
                "{:#x} is {:?} after execution",
                proposal.id, state
            )));
        }

        info!(
            "{}: executed operation {:#x}",
            proposal.description, proposal.id
        );
        Ok(())
    }

    /// Block until the operation is ready or done, per the wait strategy
    async fn wait_until_ready(
        &self,
        client: &Client,
        proposal: &Proposal,
    ) -> Result<OperationState, ScriptError> {
        let id = proposal.id;
        let start = Instant::now();
        loop {
            let ready_at = self.timestamp(client, id).await?;
            let now = latest_timestamp(client).await?;
            if let Some(state) = OperationState::from_timestamp(ready_at, now).wait_outcome(id)? {
                return Ok(state);
            }

            match self.wait {
                WaitStrategy::AdvanceTime => {
                    let remaining = u64::try_from(ready_at - U256::from(now))
                        .map_err(|e| ScriptError::OperationState(e.to_string()))?;
                    advance_time(client, remaining).await?;
                }
                WaitStrategy::Poll { interval, timeout } => {
                    if start.elapsed() >= timeout {
                        return Err(self.defer(proposal));
                    }
                    tokio::time::sleep(interval).await;
                }
                WaitStrategy::Defer => return Err(self.defer(proposal)),
            }
        }
    }

    /// Persist the proposal, returning the error reporting it as pending
    fn defer(&self, proposal: &Proposal) -> ScriptError {
        let path = match proposal.write_to(&self.proposals_dir) {
            Ok(path) => path,
            Err(e) => return e,
        };
        warn!(
            "{}: operation {:#x} is pending, proposal written to {}",
            proposal.description,
            proposal.id,
            path.display()
        );

        ScriptError::OperationPending(proposal.id)
    }

    /// A written proposal upgrading `proxy` that is scheduled but not executed
    pub async fn pending_upgrade(
        &self,
        client: &Client,
        proxy_admin: Address,
        proxy: Address,
    ) -> Result<Option<Proposal>, ScriptError> {
        for proposal in Proposal::load_all(&self.proposals_dir)? {
            if !proposal.upgrades_proxy(self.address, proxy_admin, proxy) {
                continue;
            }
            if self.state(client, proposal.id).await?.is_pending() {
                return Ok(Some(proposal));
            }
        }

        Ok(None)
    }

    /// Cancel a pending operation
    pub async fn cancel(&self, client: &Client, id: B256) -> Result<(), ScriptError> {
        let state = self.state(client, id).await?;
        if !state.is_pending() {
            return Err(ScriptError::OperationState(format!(
                "cannot cancel {id:#x}, it is {state:?}"
            )));
        }

        let calldata = ITimelockController::cancelCall { id }.abi_encode();
        send_tx(client, call_request(self.address, calldata, U256::ZERO)).await?;
        info!("cancelled operation {id:#x}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{keccak256, Address, Bytes, B256, U256},
        sol_types::SolCall,
    };

    use super::{
        random_salt, salt_for, BatchOperation, Operation, OperationState, Proposal, TimelockOp,
        WaitStrategy,
    };
    use crate::{
        constants::{ANVIL_CHAIN_ID, POLYGON_CHAIN_ID},
        errors::ScriptError,
        proxy::upgrade_calldata,
        solidity::ITimelockController,
    };

    /// A 32-byte word holding a small integer
    fn word(n: u64) -> [u8; 32] {
        U256::from(n).to_be_bytes::<32>()
    }

    #[test]
    fn test_operation_id_matches_abi_encode() {
        let target = Address::repeat_byte(0x11);
        let predecessor = B256::repeat_byte(0x22);
        let salt = B256::repeat_byte(0x33);
        let op = Operation {
            target,
            value: U256::from(5),
            data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
            predecessor,
            salt,
        };

        // Head: target, value, offset of `data`, predecessor, salt. Tail: length, padded data
        let mut expected = Vec::new();
        expected.extend_from_slice(&[0u8; 12]);
        expected.extend_from_slice(target.as_slice());
        expected.extend_from_slice(&word(5));
        expected.extend_from_slice(&word(5 * 32));
        expected.extend_from_slice(predecessor.as_slice());
        expected.extend_from_slice(salt.as_slice());
        expected.extend_from_slice(&word(4));
        expected.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        expected.extend_from_slice(&[0u8; 28]);

        assert_eq!(op.id(), keccak256(expected));
    }

    #[test]
    fn test_operation_id_depends_on_salt() {
        let target = Address::repeat_byte(1);
        let a = Operation::new(target, vec![1u8], salt_for("a"));
        let b = Operation::new(target, vec![1u8], salt_for("b"));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), Operation::new(target, vec![1u8], salt_for("a")).id());
    }

    #[test]
    fn test_batch_id_differs_from_single() {
        let target = Address::repeat_byte(1);
        let data = Bytes::from(vec![1u8, 2, 3]);
        let salt = salt_for("same");

        let single = Operation::new(target, data.clone(), salt);
        let batch = BatchOperation::new(vec![(target, data)], salt);

        assert_eq!(batch.values, vec![U256::ZERO]);
        assert_ne!(single.id(), batch.id());
    }

    #[test]
    fn test_random_salts_differ() {
        assert_ne!(random_salt(), random_salt());
    }

    #[test]
    fn test_state_from_timestamp() {
        let now = 1_000;
        assert_eq!(
            OperationState::from_timestamp(U256::ZERO, now),
            OperationState::Unset
        );
        assert_eq!(
            OperationState::from_timestamp(U256::from(1), now),
            OperationState::Done
        );
        assert_eq!(
            OperationState::from_timestamp(U256::from(1_001), now),
            OperationState::Waiting
        );
        assert_eq!(
            OperationState::from_timestamp(U256::from(1_000), now),
            OperationState::Ready
        );
        assert!(OperationState::Ready.is_pending());
        assert!(!OperationState::Done.is_pending());
    }

    #[test]
    fn test_calldata_selectors() {
        let op = TimelockOp::Single(Operation::new(Address::ZERO, Vec::<u8>::new(), B256::ZERO));
        assert_eq!(
            op.schedule_calldata(60)[..4],
            ITimelockController::scheduleCall::SELECTOR
        );
        assert_eq!(
            op.execute_calldata()[..4],
            ITimelockController::executeCall::SELECTOR
        );

        let batch = TimelockOp::Batch(BatchOperation::new(vec![], B256::ZERO));
        assert_eq!(
            batch.schedule_calldata(60)[..4],
            ITimelockController::scheduleBatchCall::SELECTOR
        );
        assert_eq!(
            batch.execute_calldata()[..4],
            ITimelockController::executeBatchCall::SELECTOR
        );
    }

    #[test]
    fn test_proposal_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let op = TimelockOp::Batch(BatchOperation::new(
            vec![
                (Address::repeat_byte(1), Bytes::from(vec![1u8])),
                (Address::repeat_byte(2), Bytes::from(vec![2u8])),
            ],
            salt_for("paywall pricing"),
        ));
        let proposal = Proposal::new("paywall pricing", Address::repeat_byte(9), op, 120);

        let path = proposal.write_to(dir.path()).unwrap();
        assert!(path.ends_with(format!("{:#x}.json", proposal.id)));
        assert_eq!(Proposal::load(&path).unwrap(), proposal);
    }

    #[test]
    fn test_proposal_rejects_tampered_operation() {
        let dir = tempfile::tempdir().unwrap();
        let op = TimelockOp::Single(Operation::new(
            Address::repeat_byte(1),
            vec![1u8],
            salt_for("pause"),
        ));
        let mut proposal = Proposal::new("pause", Address::repeat_byte(9), op, 60);
        proposal.operation = TimelockOp::Single(Operation::new(
            Address::repeat_byte(2),
            vec![1u8],
            salt_for("pause"),
        ));

        let path = proposal.write_to(dir.path()).unwrap();
        assert!(matches!(Proposal::load(&path), Err(ScriptError::Serde(_))));
    }

    #[test]
    fn test_wait_outcome() {
        let id = B256::repeat_byte(1);
        assert_eq!(OperationState::Waiting.wait_outcome(id).unwrap(), None);
        assert_eq!(
            OperationState::Ready.wait_outcome(id).unwrap(),
            Some(OperationState::Ready)
        );

        // Executed by another account while waiting
        assert_eq!(
            OperationState::Done.wait_outcome(id).unwrap(),
            Some(OperationState::Done)
        );

        // Cancelled while waiting
        assert!(matches!(
            OperationState::Unset.wait_outcome(id),
            Err(ScriptError::OperationState(_))
        ));
    }

    #[test]
    fn test_advance_time_only_on_development() {
        WaitStrategy::AdvanceTime
            .check_supported(ANVIL_CHAIN_ID)
            .unwrap();
        assert!(matches!(
            WaitStrategy::AdvanceTime.check_supported(POLYGON_CHAIN_ID),
            Err(ScriptError::UnsupportedNetwork(_))
        ));
        assert!(WaitStrategy::AdvanceTime.check_supported(1).is_err());

        WaitStrategy::Defer.check_supported(POLYGON_CHAIN_ID).unwrap();
    }

    #[test]
    fn test_load_all_proposals() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("proposals");
        assert!(Proposal::load_all(&missing).unwrap().is_empty());

        let timelock = Address::repeat_byte(9);
        let target = Address::repeat_byte(1);
        let pause = TimelockOp::Single(Operation::new(target, vec![1u8], salt_for("pause")));
        let unpause = TimelockOp::Single(Operation::new(target, vec![2u8], salt_for("unpause")));
        for (description, op) in [("pause", pause), ("unpause", unpause)] {
            Proposal::new(description, timelock, op, 60)
                .write_to(&missing)
                .unwrap();
        }
        std::fs::write(missing.join("notes.txt"), "not a proposal").unwrap();

        let mut descriptions: Vec<String> = Proposal::load_all(&missing)
            .unwrap()
            .into_iter()
            .map(|p| p.description)
            .collect();
        descriptions.sort();
        assert_eq!(descriptions, vec!["pause", "unpause"]);
    }

    #[test]
    fn test_upgrades_proxy() {
        let timelock = Address::repeat_byte(9);
        let proxy_admin = Address::repeat_byte(8);
        let proxy = Address::repeat_byte(1);
        let upgrade = upgrade_calldata(proxy, Address::repeat_byte(2), None);

        let op = TimelockOp::Single(Operation::new(proxy_admin, upgrade.clone(), random_salt()));
        let proposal = Proposal::new("upgrade", timelock, op, 60);
        assert!(proposal.upgrades_proxy(timelock, proxy_admin, proxy));
        assert!(!proposal.upgrades_proxy(timelock, proxy_admin, Address::repeat_byte(3)));
        assert!(!proposal.upgrades_proxy(Address::repeat_byte(7), proxy_admin, proxy));

        // A batch is never resumed as an upgrade
        let batch = TimelockOp::Batch(BatchOperation::new(
            vec![(proxy_admin, upgrade)],
            random_salt(),
        ));
        let proposal = Proposal::new("upgrade", timelock, batch, 60);
        assert!(!proposal.upgrades_proxy(timelock, proxy_admin, proxy));
    }
}
