//! Definitions of errors that can occur during the execution of the contract management scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy::primitives::B256;

/// Errors that can occur during the execution of the contract management scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading a file (deployments, config, artifacts, proposals)
    ReadFile(String),
    /// Error writing a file
    WriteFile(String),
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// The game configuration is invalid
    InvalidConfig(String),
    /// A contract is missing from the deployments file
    MissingDeployment(String),
    /// The deployments file belongs to a different chain
    ChainMismatch(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A transaction was mined but reverted
    TransactionReverted(String),
    /// Error de/serializing a JSON document
    Serde(String),
    /// A timelock operation is scheduled but not yet executable
    OperationPending(B256),
    /// A timelock operation is in a state that does not allow the requested action
    OperationState(String),
    /// A command is not available on the connected network
    UnsupportedNetwork(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::InvalidConfig(s) => write!(f, "invalid config: {}", s),
            ScriptError::MissingDeployment(s) => write!(f, "missing deployment: {}", s),
            ScriptError::ChainMismatch(s) => write!(f, "chain mismatch: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::TransactionReverted(s) => write!(f, "transaction reverted: {}", s),
            ScriptError::Serde(s) => write!(f, "error de/serializing: {}", s),
            ScriptError::OperationPending(id) => {
                write!(f, "timelock operation {:#x} is scheduled but not ready", id)
            }
            ScriptError::OperationState(s) => write!(f, "invalid timelock operation state: {}", s),
            ScriptError::UnsupportedNetwork(s) => write!(f, "unsupported network: {}", s),
        }
    }
}

impl Error for ScriptError {}
