//! Constants used in the deploy and admin scripts

use alloy::primitives::{b256, B256};

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The storage slot containing the implementation contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const PROXY_IMPLEMENTATION_STORAGE_SLOT: B256 =
    b256!("360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The number of times to poll for a transaction receipt before giving up
pub const RECEIPT_POLL_ATTEMPTS: usize = 60;

/// The delay between receipt polls, in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 500;

/// The timestamp `TimelockController` records for an executed operation
pub const TIMELOCK_DONE_TIMESTAMP: u64 = 1;

/// The default interval between readiness polls for a timelock operation, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// The default amount of time to wait for a timelock operation to become ready, in seconds
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 600;

/// The first default account of an Anvil / Ganache devnet
pub const DEFAULT_DEVNET_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The default devnet RPC URL
pub const DEFAULT_DEVNET_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default path of the game config file
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// The default directory of compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";

/// The default directory in which timelock proposals are written
pub const DEFAULT_PROPOSALS_DIR: &str = "proposals";

/// The file extension of compiled contract artifacts
pub const ARTIFACT_EXTENSION: &str = "json";

/// The prefix of an unlinked library placeholder in creation bytecode
pub const LIBRARY_PLACEHOLDER_PREFIX: &str = "__$";

/// The RPC method used to advance the clock of a development chain
pub const EVM_INCREASE_TIME_METHOD: &str = "evm_increaseTime";

/// The RPC method used to mine a block on a development chain
pub const EVM_MINE_METHOD: &str = "evm_mine";

/// The chain ID of an Anvil devnet
pub const ANVIL_CHAIN_ID: u64 = 31337;

/// The chain ID of a Ganache devnet
pub const GANACHE_CHAIN_ID: u64 = 1337;

/// The chain ID of the Polygon Mumbai testnet
pub const MUMBAI_CHAIN_ID: u64 = 80001;

/// The chain ID of Polygon mainnet
pub const POLYGON_CHAIN_ID: u64 = 137;
