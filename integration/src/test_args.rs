//! Defines arguments passed to each test

use std::path::PathBuf;

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider},
};
use eyre::Result;
use kitchen_scripts::{
    admin::{SaltPolicy, TimelockSettings},
    artifacts::ArtifactStore,
    context::DeployContext,
    deployments::Deployments,
    timelock::WaitStrategy,
    types::GameContract,
    utils::{setup_client, Client},
};

use crate::CliArgs;

/// The arguments for the integration tests
#[derive(Clone)]
pub struct TestArgs {
    /// The signing client of the funded devnet account
    pub client: Client,
    /// The deployment under test
    pub deployments: Deployments,
    /// The path of the deployments file
    pub deployments_path: PathBuf,
    /// The directory of compiled contract artifacts
    pub artifacts: PathBuf,
}

impl TestArgs {
    /// Connect to the devnet and read the deployment under test
    pub async fn new(cli_args: &CliArgs) -> Result<Self> {
        let client = setup_client(&cli_args.pkey, &cli_args.rpc_url).await?;
        let deployments = Deployments::load(&cli_args.deployments)?;
        eyre::ensure!(
            deployments.chain_id == client.chain_id,
            "{} records chain {}, connected to chain {}",
            cli_args.deployments.display(),
            deployments.chain_id,
            client.chain_id
        );

        Ok(Self {
            client,
            deployments,
            deployments_path: cli_args.deployments.clone(),
            artifacts: cli_args.artifacts.clone(),
        })
    }

    /// The provider, for binding contract instances
    pub fn provider(&self) -> DynProvider {
        self.client.provider.clone()
    }

    /// The address of the test account
    pub fn sender(&self) -> Address {
        self.client.sender
    }

    /// The recorded address of a contract
    pub fn address(&self, contract: GameContract) -> Result<Address> {
        Ok(self.deployments.address(contract)?)
    }

    /// A context for privileged calls, advancing the clock past any timelock delay
    pub fn context(&self) -> DeployContext {
        let settings = TimelockSettings {
            delay: 0,
            wait: WaitStrategy::AdvanceTime,
            proposals_dir: std::env::temp_dir().join("kitchen-proposals"),
            salts: SaltPolicy::Fresh,
        };

        DeployContext::new(
            self.client.clone(),
            self.deployments.clone(),
            self.deployments_path.clone(),
            ArtifactStore::new(self.artifacts.clone()),
            settings,
        )
    }

    /// The latest block number, used to check the devnet is live
    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.client.provider.get_block_number().await?)
    }
}
