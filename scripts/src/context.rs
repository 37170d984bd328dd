//! The state shared by every deploy and admin operation: the client, the
//! deployments record, the artifacts and the admin route

use std::path::PathBuf;

use alloy::{
    primitives::{Address, Bytes, B256},
    sol_types::SolCall,
};
use tracing::{info, warn};

use crate::{
    admin::{AdminRoute, TimelockSettings},
    artifacts::ArtifactStore,
    deployments::Deployments,
    errors::ScriptError,
    proxy::{implementation_of, proxy_constructor_args, upgrade_calldata, PROXY_ARTIFACT_NAME},
    solidity::IAccessControlled,
    types::{GameContract, Role},
    utils::{call_request, deploy_bytecode, send_tx, Client},
};

/// Everything an operation needs to deploy, record and administer contracts
pub struct DeployContext {
    /// The signing client
    pub client: Client,
    /// The deployment record, saved after every change
    pub deployments: Deployments,
    /// Where the deployment record lives
    pub deployments_path: PathBuf,
    /// Compiled contracts
    pub artifacts: ArtifactStore,
    /// Timelock settings from the command line
    pub timelock_settings: TimelockSettings,
    /// The route privileged calls take
    pub route: AdminRoute,
}

impl DeployContext {
    /// Create a context, choosing the admin route from the deployments record
    pub fn new(
        client: Client,
        deployments: Deployments,
        deployments_path: PathBuf,
        artifacts: ArtifactStore,
        timelock_settings: TimelockSettings,
    ) -> Self {
        let route = AdminRoute::from_deployments(&deployments, &timelock_settings);
        Self {
            client,
            deployments,
            deployments_path,
            artifacts,
            timelock_settings,
            route,
        }
    }

    /// Re-derive the admin route, e.g. after the timelock is deployed
    pub fn refresh_route(&mut self) {
        self.route = AdminRoute::from_deployments(&self.deployments, &self.timelock_settings);
    }

    /// Persist the deployments record
    pub fn save(&self) -> Result<(), ScriptError> {
        self.deployments.save(&self.deployments_path)
    }

    /// The recorded address of a contract
    pub fn address(&self, contract: GameContract) -> Result<Address, ScriptError> {
        self.deployments.address(contract)
    }

    // --------------
    // | Deployment |
    // --------------

    /// Deploy a contract that does not sit behind a proxy
    ///
    /// Skipped if the contract is already recorded
    pub async fn deploy_plain(
        &mut self,
        contract: GameContract,
        constructor_args: Vec<u8>,
    ) -> Result<Address, ScriptError> {
        if let Some(address) = self.deployments.try_address(contract) {
            info!("{contract} already deployed at {address:#x}");
            return Ok(address);
        }
        if contract.is_mock() {
            warn!("Deploying `{contract}` - THIS SHOULD ONLY BE DONE FOR TESTING");
        }

        let artifact = self.artifacts.load(contract)?;
        let address =
            deploy_bytecode(&self.client, artifact.creation_code(&constructor_args)).await?;

        self.deployments.set_address(contract, address);
        self.save()?;
        info!("{contract} deployed at {address:#x}");

        Ok(address)
    }

    /// Deploy a contract's implementation and a proxy initialized with `init_calldata`
    ///
    /// Skipped if the contract is already recorded
    pub async fn deploy_proxied(
        &mut self,
        contract: GameContract,
        init_calldata: Vec<u8>,
    ) -> Result<Address, ScriptError> {
        if let Some(address) = self.deployments.try_address(contract) {
            info!("{contract} already deployed at {address:#x}");
            return Ok(address);
        }

        let proxy_admin = self.address(GameContract::ProxyAdmin)?;
        let implementation = self.deploy_implementation(contract).await?;

        let proxy_artifact = self.artifacts.load_named(PROXY_ARTIFACT_NAME)?;
        let args = proxy_constructor_args(implementation, proxy_admin, init_calldata.into());
        let proxy = deploy_bytecode(&self.client, proxy_artifact.creation_code(&args)).await?;

        self.deployments.set_address(contract, proxy);
        self.deployments.set_implementation(contract, implementation);
        self.save()?;
        info!("{contract} proxy deployed at {proxy:#x}, implementation at {implementation:#x}");

        Ok(proxy)
    }

    /// Deploy a fresh implementation of a proxied contract
    async fn deploy_implementation(&self, contract: GameContract) -> Result<Address, ScriptError> {
        if !contract.is_proxied() {
            return Err(ScriptError::ContractDeployment(format!(
                "{contract} is not a proxied contract"
            )));
        }

        let artifact = self.artifacts.load(contract)?;
        deploy_bytecode(&self.client, artifact.bytecode).await
    }

    /// Deploy a new implementation and point the contract's proxy at it,
    /// calling into it with `calldata` if given
    pub async fn upgrade(
        &mut self,
        contract: GameContract,
        calldata: Option<Bytes>,
    ) -> Result<Address, ScriptError> {
        let proxy = self.address(contract)?;
        let proxy_admin = self.address(GameContract::ProxyAdmin)?;

        if let AdminRoute::Timelock(timelock) = self.route.clone() {
            timelock.wait.check_supported(self.client.chain_id)?;

            // Finish an earlier deferred upgrade rather than deploying another implementation
            if let Some(proposal) = timelock
                .pending_upgrade(&self.client, proxy_admin, proxy)
                .await?
            {
                info!(
                    "resuming pending upgrade of {contract}: operation {:#x}, cancel it to upgrade elsewhere",
                    proposal.id
                );
                timelock.finish(&self.client, &proposal).await?;
                return self.record_upgrade(contract, proxy).await;
            }
        }

        let implementation = self.deploy_implementation(contract).await?;
        info!("new {contract} implementation deployed at {implementation:#x}");

        let description = format!("upgrade {contract} to {implementation:#x}");
        self.route
            .call(
                &self.client,
                proxy_admin,
                upgrade_calldata(proxy, implementation, calldata),
                &description,
                self.salt(&description),
            )
            .await?;

        let current = self.record_upgrade(contract, proxy).await?;
        if current != implementation {
            return Err(ScriptError::ContractInteraction(format!(
                "{contract} proxy points at {current:#x} after upgrading to {implementation:#x}"
            )));
        }

        Ok(implementation)
    }

    /// Record the implementation a proxy now points at
    async fn record_upgrade(
        &mut self,
        contract: GameContract,
        proxy: Address,
    ) -> Result<Address, ScriptError> {
        let implementation = implementation_of(&self.client, proxy).await?;
        self.deployments.set_implementation(contract, implementation);
        self.save()?;

        Ok(implementation)
    }

    // ------------------
    // | Administration |
    // ------------------

    /// Make a privileged call on a recorded contract through the admin route
    pub async fn admin_call(
        &self,
        contract: GameContract,
        calldata: impl Into<Bytes>,
        description: &str,
    ) -> Result<(), ScriptError> {
        let target = self.address(contract)?;
        self.route
            .call(
                &self.client,
                target,
                calldata.into(),
                description,
                self.salt(description),
            )
            .await
    }

    /// Make several privileged calls through the admin route
    pub async fn admin_call_batch(
        &self,
        calls: Vec<(Address, Bytes)>,
        description: &str,
    ) -> Result<(), ScriptError> {
        self.route
            .call_batch(&self.client, calls, description, self.salt(description))
            .await
    }

    /// The timelock salt for the described action
    fn salt(&self, description: &str) -> B256 {
        self.timelock_settings.salts.salt(description)
    }

    /// Call a recorded contract as the deployer, bypassing the admin route
    pub async fn direct_call(
        &self,
        contract: GameContract,
        calldata: impl Into<Bytes>,
    ) -> Result<(), ScriptError> {
        let target = self.address(contract)?;
        send_tx(
            &self.client,
            call_request(target, calldata, Default::default()),
        )
        .await?;
        Ok(())
    }

    /// Whether `account` holds `role` on the contract
    pub async fn has_role(
        &self,
        contract: GameContract,
        role: Role,
        account: Address,
    ) -> Result<bool, ScriptError> {
        let target = self.address(contract)?;
        IAccessControlled::new(target, self.client.provider.clone())
            .hasRole(role.id(), account)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    /// Grant a role through the admin route, unless already held
    pub async fn grant_role(
        &self,
        contract: GameContract,
        role: Role,
        account: Address,
    ) -> Result<(), ScriptError> {
        if self.has_role(contract, role, account).await? {
            info!("{account:#x} already holds {} on {contract}", role.name());
            return Ok(());
        }

        let calldata = IAccessControlled::grantRoleCall {
            role: role.id(),
            account,
        }
        .abi_encode();
        let description = format!("grant {} on {contract} to {account:#x}", role.name());
        self.admin_call(contract, calldata, &description).await
    }

    /// Revoke a role through the admin route, unless not held
    pub async fn revoke_role(
        &self,
        contract: GameContract,
        role: Role,
        account: Address,
    ) -> Result<(), ScriptError> {
        if !self.has_role(contract, role, account).await? {
            info!("{account:#x} does not hold {} on {contract}", role.name());
            return Ok(());
        }

        let calldata = IAccessControlled::revokeRoleCall {
            role: role.id(),
            account,
        }
        .abi_encode();
        let description = format!("revoke {} on {contract} from {account:#x}", role.name());
        self.admin_call(contract, calldata, &description).await
    }
}
