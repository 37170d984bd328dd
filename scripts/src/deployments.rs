//! The deployments file: the addresses of every deployed contract and the
//! migrations that produced them

use std::{collections::BTreeMap, fs, path::Path};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    errors::ScriptError,
    types::{GameContract, Network},
};

/// The persistent record of a deployment
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Deployments {
    /// The network the contracts were deployed to
    pub network: Network,
    /// The chain ID the contracts were deployed to
    pub chain_id: u64,
    /// The address callers should use, i.e. the proxy for proxied contracts
    #[serde(default)]
    pub contracts: BTreeMap<String, Address>,
    /// The current implementation behind each proxy
    #[serde(default)]
    pub implementations: BTreeMap<String, Address>,
    /// The ID of the last migration that ran to completion
    #[serde(default)]
    pub last_migration: u32,
}

impl Deployments {
    /// An empty record for a fresh deployment
    pub fn new(network: Network, chain_id: u64) -> Self {
        Self {
            network,
            chain_id,
            contracts: BTreeMap::new(),
            implementations: BTreeMap::new(),
            last_migration: 0,
        }
    }

    /// Read the deployments file, starting a fresh record if it does not exist
    ///
    /// Fails if the file records a different chain than the one connected to
    pub fn load_or_default(
        path: impl AsRef<Path>,
        network: Network,
        chain_id: u64,
    ) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new(network, chain_id));
        }

        let deployments = Self::load(path)?;
        if deployments.chain_id != chain_id {
            return Err(ScriptError::ChainMismatch(format!(
                "{} records chain {}, connected to chain {}",
                path.display(),
                deployments.chain_id,
                chain_id
            )));
        }

        Ok(deployments)
    }

    /// Read an existing deployments file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents).map_err(|e| ScriptError::Serde(e.to_string()))
    }

    /// Write the record as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScriptError> {
        let path = path.as_ref();
        let contents =
            serde_json::to_string_pretty(self).map_err(|e| ScriptError::Serde(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| ScriptError::WriteFile(format!("{}: {}", path.display(), e)))
    }

    /// Whether the contract has been deployed
    pub fn has(&self, contract: GameContract) -> bool {
        self.contracts.contains_key(contract.deployment_key())
    }

    /// The address of the contract, if deployed
    pub fn try_address(&self, contract: GameContract) -> Option<Address> {
        self.contracts.get(contract.deployment_key()).copied()
    }

    /// The address of the contract
    pub fn address(&self, contract: GameContract) -> Result<Address, ScriptError> {
        self.try_address(contract).ok_or_else(|| {
            ScriptError::MissingDeployment(format!(
                "{} is not in the deployments file",
                contract.deployment_key()
            ))
        })
    }

    /// Record the address of a contract
    pub fn set_address(&mut self, contract: GameContract, address: Address) {
        self.contracts
            .insert(contract.deployment_key().to_string(), address);
    }

    /// The implementation behind a proxied contract, if recorded
    pub fn implementation(&self, contract: GameContract) -> Option<Address> {
        self.implementations.get(contract.deployment_key()).copied()
    }

    /// Record the implementation behind a proxied contract
    pub fn set_implementation(&mut self, contract: GameContract, implementation: Address) {
        self.implementations
            .insert(contract.deployment_key().to_string(), implementation);
    }
}
