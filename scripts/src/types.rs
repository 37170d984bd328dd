//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::primitives::{keccak256, B256};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{ANVIL_CHAIN_ID, GANACHE_CHAIN_ID, MUMBAI_CHAIN_ID, POLYGON_CHAIN_ID},
    errors::ScriptError,
};

/// The contracts managed by the scripts
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameContract {
    /// The trait probability tables
    Properties,
    /// The chef / rat NFT
    Character,
    /// The first-tier food token
    FastFood,
    /// The second-tier food token
    CasualFood,
    /// The third-tier food token
    GourmetFood,
    /// Mint pricing and whitelist gating
    Paywall,
    /// The VRF-backed mint entrypoint
    Mint,
    /// The VRF-backed claim entrypoint shared by all venues
    Claim,
    /// The kitchen earning fast food
    McStake,
    /// The kitchen earning casual food
    TheStakehouse,
    /// The kitchen earning gourmet food
    LeStake,
    /// The venue training tolerance
    Gym,
    /// The admin contract of every transparent proxy
    ProxyAdmin,
    /// The OpenZeppelin timelock guarding privileged calls
    TimelockController,
    /// The LINK token mock, development only
    LinkToken,
    /// The VRF coordinator mock, development only
    VrfCoordinatorMock,
}

impl GameContract {
    /// The contracts that implement `AccessControl` and `Pausable`
    pub const ACCESS_CONTROLLED: [GameContract; 12] = [
        GameContract::Properties,
        GameContract::Character,
        GameContract::FastFood,
        GameContract::CasualFood,
        GameContract::GourmetFood,
        GameContract::Paywall,
        GameContract::Mint,
        GameContract::Claim,
        GameContract::McStake,
        GameContract::TheStakehouse,
        GameContract::LeStake,
        GameContract::Gym,
    ];

    /// The file stem of the contract's compiled artifact
    pub fn artifact_name(&self) -> &'static str {
        match self {
            GameContract::Properties => "Properties",
            GameContract::Character => "Character",
            GameContract::FastFood => "FastFood",
            GameContract::CasualFood => "CasualFood",
            GameContract::GourmetFood => "GourmetFood",
            GameContract::Paywall => "Paywall",
            GameContract::Mint => "Mint",
            GameContract::Claim => "Claim",
            GameContract::McStake => "McStake",
            GameContract::TheStakehouse => "TheStakehouse",
            GameContract::LeStake => "LeStake",
            GameContract::Gym => "Gym",
            GameContract::ProxyAdmin => "ProxyAdmin",
            GameContract::TimelockController => "TimelockController",
            GameContract::LinkToken => "LinkToken",
            GameContract::VrfCoordinatorMock => "VRFCoordinatorMock",
        }
    }

    /// The key under which the contract is recorded in the deployments file
    pub fn deployment_key(&self) -> &'static str {
        self.artifact_name()
    }

    /// Whether the contract sits behind a `TransparentUpgradeableProxy`
    pub fn is_proxied(&self) -> bool {
        Self::ACCESS_CONTROLLED.contains(self)
    }

    /// Whether the contract is a mock that only exists on development chains
    pub fn is_mock(&self) -> bool {
        matches!(self, GameContract::LinkToken | GameContract::VrfCoordinatorMock)
    }

    /// Whether the contract is a food token
    pub fn is_food_token(&self) -> bool {
        matches!(
            self,
            GameContract::FastFood | GameContract::CasualFood | GameContract::GourmetFood
        )
    }
}

impl Display for GameContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameContract::Properties => write!(f, "properties"),
            GameContract::Character => write!(f, "character"),
            GameContract::FastFood => write!(f, "fast-food"),
            GameContract::CasualFood => write!(f, "casual-food"),
            GameContract::GourmetFood => write!(f, "gourmet-food"),
            GameContract::Paywall => write!(f, "paywall"),
            GameContract::Mint => write!(f, "mint"),
            GameContract::Claim => write!(f, "claim"),
            GameContract::McStake => write!(f, "mc-stake"),
            GameContract::TheStakehouse => write!(f, "the-stakehouse"),
            GameContract::LeStake => write!(f, "le-stake"),
            GameContract::Gym => write!(f, "gym"),
            GameContract::ProxyAdmin => write!(f, "proxy-admin"),
            GameContract::TimelockController => write!(f, "timelock-controller"),
            GameContract::LinkToken => write!(f, "link-token"),
            GameContract::VrfCoordinatorMock => write!(f, "vrf-coordinator-mock"),
        }
    }
}

/// Roles granted through `AccessControl`
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// May grant and revoke every other role, pause and unpause
    DefaultAdmin,
    /// May mint and burn tokens, or mutate characters
    Controller,
    /// May move characters on behalf of their owners and request claims
    Venue,
    /// May schedule timelock operations
    Proposer,
    /// May execute ready timelock operations
    Executor,
    /// May cancel pending timelock operations
    Canceller,
}

impl Role {
    /// The name the contracts hash to derive the role identifier
    pub fn name(&self) -> &'static str {
        match self {
            Role::DefaultAdmin => "DEFAULT_ADMIN_ROLE",
            Role::Controller => "CONTROLLER_ROLE",
            Role::Venue => "VENUE_ROLE",
            Role::Proposer => "PROPOSER_ROLE",
            Role::Executor => "EXECUTOR_ROLE",
            Role::Canceller => "CANCELLER_ROLE",
        }
    }

    /// The `bytes32` role identifier
    pub fn id(&self) -> B256 {
        match self {
            // `AccessControl` defines the admin role as zero rather than a hash
            Role::DefaultAdmin => B256::ZERO,
            _ => keccak256(self.name()),
        }
    }
}

/// The networks the scripts know how to configure
#[derive(ValueEnum, Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// A local Anvil or Ganache chain with mocked VRF
    Development,
    /// The Polygon Mumbai testnet
    Mumbai,
    /// Polygon mainnet
    Polygon,
}

impl Network {
    /// The chain IDs this network may report
    pub fn chain_ids(&self) -> &'static [u64] {
        match self {
            Network::Development => &[ANVIL_CHAIN_ID, GANACHE_CHAIN_ID],
            Network::Mumbai => &[MUMBAI_CHAIN_ID],
            Network::Polygon => &[POLYGON_CHAIN_ID],
        }
    }

    /// The network a chain ID belongs to
    pub fn from_chain_id(chain_id: u64) -> Result<Self, ScriptError> {
        [Network::Development, Network::Mumbai, Network::Polygon]
            .into_iter()
            .find(|network| network.accepts_chain_id(chain_id))
            .ok_or_else(|| ScriptError::UnsupportedNetwork(format!("chain id {chain_id}")))
    }

    /// Whether the given chain ID belongs to this network
    pub fn accepts_chain_id(&self, chain_id: u64) -> bool {
        self.chain_ids().contains(&chain_id)
    }

    /// Whether this is a development chain whose clock can be advanced
    pub fn is_development(&self) -> bool {
        matches!(self, Network::Development)
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Development => write!(f, "development"),
            Network::Mumbai => write!(f, "mumbai"),
            Network::Polygon => write!(f, "polygon"),
        }
    }
}
