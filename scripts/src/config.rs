//! The static game configuration: every numeric and address constant the
//! migrations feed into the contracts, with a preset per network

use std::{fs, path::Path};

use alloy::primitives::{address, b256, Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{errors::ScriptError, types::Network};

/// The largest percentage value the contracts accept
const MAX_PERCENTAGE: u8 = 100;

/// Seconds in a day
const DAY: u64 = 24 * 60 * 60;

/// The configuration of a full game deployment on one network
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// The network this configuration targets
    pub network: Network,
    /// Chainlink VRF parameters shared by `Mint` and `Claim`
    pub vrf: VrfConfig,
    /// Mint supply limits
    pub mint: MintConfig,
    /// Mint pricing and whitelist
    pub paywall: PaywallConfig,
    /// Trait mutation probabilities
    pub properties: PropertiesConfig,
    /// The food kitchens
    pub kitchens: KitchensConfig,
    /// The gym
    pub gym: GymConfig,
    /// The timelock guarding privileged calls
    pub timelock: TimelockConfig,
    /// LINK sent to each VRF consumer on development chains
    pub dev_link_funding: U256,
}

/// Chainlink VRF parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VrfConfig {
    /// The VRF coordinator; a mock is deployed when absent on development
    pub coordinator: Option<Address>,
    /// The LINK token; a mock is deployed when absent on development
    pub link_token: Option<Address>,
    /// The key hash identifying the oracle's proving key
    pub key_hash: B256,
    /// The LINK fee per randomness request
    pub fee: U256,
}

/// Mint supply limits
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MintConfig {
    /// The maximum number of characters ever minted
    pub max_supply: u64,
    /// The maximum number of characters minted in one request
    pub max_mints_per_tx: u8,
}

/// Mint pricing and whitelist
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PaywallConfig {
    /// The price of a single mint, in wei
    pub mint_price: U256,
    /// Whether only whitelisted accounts may mint
    pub only_whitelist: bool,
    /// Accounts allowed to mint while the whitelist is enforced
    pub whitelist: Vec<Address>,
    /// Accounts granted a free mint
    pub free_mints: Vec<Address>,
}

/// Probabilities, in percent, of a claim damaging or improving a trait
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TraitProbabilities {
    /// The chance of a disaster resetting the trait
    pub disaster: u8,
    /// The chance of a mutation improving the trait
    pub mutation: u8,
}

/// The trait probabilities of one kind of character
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CharacterProperties {
    /// Efficiency trait probabilities
    pub efficiency: TraitProbabilities,
    /// Tolerance trait probabilities
    pub tolerance: TraitProbabilities,
}

impl CharacterProperties {
    /// The layout `Properties.initialize` expects
    pub fn as_array(&self) -> [u8; 4] {
        [
            self.efficiency.disaster,
            self.efficiency.mutation,
            self.tolerance.disaster,
            self.tolerance.mutation,
        ]
    }
}

/// Trait probabilities for chefs and rats
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PropertiesConfig {
    /// Chef probabilities
    pub chef: CharacterProperties,
    /// Rat probabilities
    pub rat: CharacterProperties,
}

/// The economy of a single food kitchen
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct KitchenConfig {
    /// The cap on the food token the kitchen mints
    pub food_token_max_supply: U256,
    /// Food earned by a chef of full efficiency per day
    pub daily_chef_earnings: U256,
    /// The share of chef earnings stolen by staked rats, in percent
    pub rat_theft_percentage: u8,
    /// Seconds a character must stay staked before claiming
    pub vesting_period: u64,
    /// Seconds between trait updates
    pub accrual_period: u64,
    /// Efficiency multiplier applied to chef earnings
    pub chef_efficiency_multiplier: u64,
    /// Efficiency multiplier applied to rat earnings
    pub rat_efficiency_multiplier: u64,
    /// Offset added to rat efficiency before the multiplier
    pub rat_efficiency_offset: i64,
    /// The maximum number of tokens claimed in one transaction
    pub max_claims_per_tx: u8,
}

/// The three food kitchens
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct KitchensConfig {
    /// The fast food kitchen
    pub mc_stake: KitchenConfig,
    /// The casual food kitchen
    pub the_stakehouse: KitchenConfig,
    /// The gourmet food kitchen
    pub le_stake: KitchenConfig,
}

/// The tolerance training venue
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GymConfig {
    /// Tolerance points gained per day of training
    pub daily_tolerance_gain: u64,
    /// Seconds a character must stay staked before claiming
    pub vesting_period: u64,
    /// Seconds between trait updates
    pub accrual_period: u64,
}

/// The timelock guarding privileged calls
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimelockConfig {
    /// The minimum delay between scheduling and executing, in seconds
    pub min_delay: u64,
    /// Accounts allowed to schedule; the deployer when empty
    pub proposers: Vec<Address>,
    /// Accounts allowed to execute; anyone when empty
    pub executors: Vec<Address>,
    /// An optional admin able to reconfigure the timelock roles
    pub admin: Option<Address>,
    /// Whether the deployer gives up its admin role once the timelock holds it
    pub renounce_deployer_admin: bool,
}

impl GameConfig {
    /// The built-in configuration for the given network
    pub fn preset(network: Network) -> Self {
        match network {
            Network::Development => Self::development(),
            Network::Mumbai => Self::mumbai(),
            Network::Polygon => Self::polygon(),
        }
    }

    /// Fast periods and mocked VRF for local testing
    fn development() -> Self {
        let mut kitchens = Self::default_kitchens();
        for kitchen in [
            &mut kitchens.mc_stake,
            &mut kitchens.the_stakehouse,
            &mut kitchens.le_stake,
        ] {
            kitchen.vesting_period = 60;
            kitchen.accrual_period = 60;
        }

        Self {
            network: Network::Development,
            vrf: VrfConfig {
                coordinator: None,
                link_token: None,
                key_hash: b256!("0x6c3699283bda56ad74f6b855546325b68d482e983852a7a82979cc4807b641f4"),
                fee: milli_ether(100),
            },
            mint: MintConfig {
                max_supply: 50_000,
                max_mints_per_tx: 10,
            },
            paywall: PaywallConfig {
                mint_price: milli_ether(10),
                only_whitelist: false,
                whitelist: vec![],
                free_mints: vec![],
            },
            properties: Self::default_properties(),
            kitchens,
            gym: GymConfig {
                daily_tolerance_gain: 12,
                vesting_period: 60,
                accrual_period: 60,
            },
            timelock: TimelockConfig {
                min_delay: 60,
                proposers: vec![],
                executors: vec![],
                admin: None,
                renounce_deployer_admin: false,
            },
            dev_link_funding: ether(10),
        }
    }

    /// The Mumbai testnet with Chainlink's testnet VRF
    fn mumbai() -> Self {
        Self {
            network: Network::Mumbai,
            vrf: VrfConfig {
                coordinator: Some(address!("0x8c7382f9d8f56b33781fe506e897a4f1e2d17255")),
                link_token: Some(address!("0x326c977e6efc84e512bb9c30f76e30c160ed06fb")),
                key_hash: b256!("0x6e75b569a01ef56d18cab6a8e71e6600d6ce853834d4a5748b720d06f878b3a4"),
                fee: micro_ether(100),
            },
            mint: MintConfig {
                max_supply: 50_000,
                max_mints_per_tx: 10,
            },
            paywall: PaywallConfig {
                mint_price: milli_ether(10),
                only_whitelist: false,
                whitelist: vec![],
                free_mints: vec![],
            },
            properties: Self::default_properties(),
            kitchens: Self::default_kitchens(),
            gym: Self::default_gym(),
            timelock: TimelockConfig {
                min_delay: 5 * 60,
                // Filled in before running the timelock migration
                proposers: vec![],
                executors: vec![],
                admin: None,
                renounce_deployer_admin: false,
            },
            dev_link_funding: U256::ZERO,
        }
    }

    /// Polygon mainnet with Chainlink's production VRF
    fn polygon() -> Self {
        Self {
            network: Network::Polygon,
            vrf: VrfConfig {
                coordinator: Some(address!("0x3d2341adb2d31f1c5530cdc622016af293177ae0")),
                link_token: Some(address!("0xb0897686c545045afc77cf20ec7a532e3120e0f1")),
                key_hash: b256!("0xf86195cf7690c55907b2b611ebb7343a6f649bff128701cc542f0569e2c549da"),
                fee: micro_ether(100),
            },
            mint: MintConfig {
                max_supply: 50_000,
                max_mints_per_tx: 10,
            },
            paywall: PaywallConfig {
                mint_price: ether(50),
                only_whitelist: true,
                whitelist: vec![],
                free_mints: vec![],
            },
            properties: Self::default_properties(),
            kitchens: Self::default_kitchens(),
            gym: Self::default_gym(),
            timelock: TimelockConfig {
                min_delay: 2 * DAY,
                // Filled in with the multisig before running the timelock migration
                proposers: vec![],
                executors: vec![],
                admin: None,
                renounce_deployer_admin: true,
            },
            dev_link_funding: U256::ZERO,
        }
    }

    /// The trait probabilities used on every network
    fn default_properties() -> PropertiesConfig {
        PropertiesConfig {
            chef: CharacterProperties {
                efficiency: TraitProbabilities {
                    disaster: 5,
                    mutation: 20,
                },
                tolerance: TraitProbabilities {
                    disaster: 5,
                    mutation: 20,
                },
            },
            rat: CharacterProperties {
                efficiency: TraitProbabilities {
                    disaster: 10,
                    mutation: 20,
                },
                tolerance: TraitProbabilities {
                    disaster: 10,
                    mutation: 20,
                },
            },
        }
    }

    /// The kitchen economies used on live networks
    fn default_kitchens() -> KitchensConfig {
        let kitchen = |max_supply: u64, daily_earnings: u64| KitchenConfig {
            food_token_max_supply: ether(max_supply),
            daily_chef_earnings: ether(daily_earnings),
            rat_theft_percentage: 20,
            vesting_period: DAY,
            accrual_period: DAY,
            chef_efficiency_multiplier: 175,
            rat_efficiency_multiplier: 90,
            rat_efficiency_offset: -10,
            max_claims_per_tx: 10,
        };

        KitchensConfig {
            mc_stake: kitchen(1_000_000_000, 1_000),
            the_stakehouse: kitchen(100_000_000, 250),
            le_stake: kitchen(10_000_000, 50),
        }
    }

    /// The gym used on live networks
    fn default_gym() -> GymConfig {
        GymConfig {
            daily_tolerance_gain: 12,
            vesting_period: DAY,
            accrual_period: DAY,
        }
    }

    /// Check the configuration for values the contracts reject or the
    /// migrations cannot deploy
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.mint.max_supply == 0 {
            return Err(invalid("mint.max_supply must be positive"));
        }
        if self.mint.max_mints_per_tx == 0 {
            return Err(invalid("mint.max_mints_per_tx must be positive"));
        }

        for (name, props) in [("chef", &self.properties.chef), ("rat", &self.properties.rat)] {
            for (trait_name, probs) in [
                ("efficiency", &props.efficiency),
                ("tolerance", &props.tolerance),
            ] {
                if probs.disaster as u16 + probs.mutation as u16 > MAX_PERCENTAGE as u16 {
                    return Err(invalid(&format!(
                        "properties.{name}.{trait_name}: disaster + mutation exceeds {MAX_PERCENTAGE}%"
                    )));
                }
            }
        }

        for (name, kitchen) in [
            ("mc_stake", &self.kitchens.mc_stake),
            ("the_stakehouse", &self.kitchens.the_stakehouse),
            ("le_stake", &self.kitchens.le_stake),
        ] {
            kitchen.validate(name)?;
        }
        validate_periods("gym", self.gym.vesting_period, self.gym.accrual_period)?;

        if !self.network.is_development() {
            if self.vrf.coordinator.is_none() || self.vrf.link_token.is_none() {
                return Err(invalid(&format!(
                    "vrf.coordinator and vrf.link_token are required on {}",
                    self.network
                )));
            }
            if self.timelock.min_delay == 0 {
                return Err(invalid(&format!(
                    "timelock.min_delay must be positive on {}",
                    self.network
                )));
            }
            if self.timelock.proposers.is_empty() {
                return Err(invalid(&format!(
                    "timelock.proposers must be set on {}",
                    self.network
                )));
            }
        }

        if self.timelock.renounce_deployer_admin && self.timelock.proposers.is_empty() {
            return Err(invalid(
                "timelock.proposers must be set when the deployer renounces admin",
            ));
        }

        Ok(())
    }

    /// Read and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ScriptError::Serde(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as pretty JSON
    pub fn to_json(&self) -> Result<String, ScriptError> {
        serde_json::to_string_pretty(self).map_err(|e| ScriptError::Serde(e.to_string()))
    }

    /// Write the configuration to a file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ScriptError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .map_err(|e| ScriptError::WriteFile(format!("{}: {}", path.display(), e)))
    }
}

impl KitchenConfig {
    /// Check the kitchen's economy
    fn validate(&self, name: &str) -> Result<(), ScriptError> {
        if self.rat_theft_percentage > MAX_PERCENTAGE {
            return Err(invalid(&format!(
                "kitchens.{name}.rat_theft_percentage exceeds {MAX_PERCENTAGE}%"
            )));
        }
        if self.food_token_max_supply.is_zero() {
            return Err(invalid(&format!(
                "kitchens.{name}.food_token_max_supply must be positive"
            )));
        }
        if self.max_claims_per_tx == 0 {
            return Err(invalid(&format!(
                "kitchens.{name}.max_claims_per_tx must be positive"
            )));
        }

        validate_periods(&format!("kitchens.{name}"), self.vesting_period, self.accrual_period)
    }
}

/// Accrual must tick, and nothing can vest before the first tick
fn validate_periods(name: &str, vesting_period: u64, accrual_period: u64) -> Result<(), ScriptError> {
    if accrual_period == 0 {
        return Err(invalid(&format!("{name}.accrual_period must be positive")));
    }
    if vesting_period < accrual_period {
        return Err(invalid(&format!(
            "{name}.vesting_period must be at least the accrual period"
        )));
    }

    Ok(())
}

/// Shorthand for an invalid config error
fn invalid(msg: &str) -> ScriptError {
    ScriptError::InvalidConfig(msg.to_string())
}

/// `amount` whole units of an 18-decimal token
pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(18u64))
}

/// `amount` thousandths of an 18-decimal token
fn milli_ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(15u64))
}

/// `amount` millionths of an 18-decimal token
fn micro_ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(12u64))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, U256};

    use super::{ether, GameConfig};
    use crate::{errors::ScriptError, types::Network};

    /// A live network preset with its proposers filled in
    fn live_config(network: Network) -> GameConfig {
        let mut config = GameConfig::preset(network);
        config.timelock.proposers = vec![Address::repeat_byte(0x11)];
        config
    }

    #[test]
    fn test_development_preset_validates() {
        // The deployer becomes the proposer when none are configured
        let config = GameConfig::preset(Network::Development);
        assert!(config.timelock.proposers.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_live_presets_require_proposers() {
        for network in [Network::Mumbai, Network::Polygon] {
            let err = GameConfig::preset(network).validate().unwrap_err();
            assert!(matches!(err, ScriptError::InvalidConfig(_)));
            assert!(err.to_string().contains("timelock.proposers"));

            live_config(network).validate().unwrap();
        }
    }

    #[test]
    fn test_rejects_probabilities_above_one_hundred() {
        let mut config = GameConfig::preset(Network::Development);
        config.properties.rat.tolerance.disaster = 60;
        config.properties.rat.tolerance.mutation = 41;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("properties.rat.tolerance"));
    }

    #[test]
    fn test_rejects_vesting_shorter_than_accrual() {
        let mut config = GameConfig::preset(Network::Development);
        config.kitchens.le_stake.vesting_period = 10;
        config.kitchens.le_stake.accrual_period = 20;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("kitchens.le_stake"));
    }

    #[test]
    fn test_rejects_zero_accrual() {
        let mut config = GameConfig::preset(Network::Development);
        config.gym.accrual_period = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_live_network_requires_vrf() {
        let mut config = live_config(Network::Mumbai);
        config.vrf.coordinator = None;
        assert!(config.validate().is_err());

        // Development deploys mocks instead
        let mut config = GameConfig::preset(Network::Development);
        config.vrf.coordinator = None;
        config.validate().unwrap();
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = live_config(Network::Mumbai);
        config.write(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = GameConfig::preset(Network::Development);
        config.mint.max_supply = 0;
        config.write(&path).unwrap();

        assert!(matches!(
            GameConfig::load(&path),
            Err(ScriptError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_character_properties_layout() {
        let props = GameConfig::preset(Network::Development).properties.rat;
        assert_eq!(props.as_array(), [10, 20, 10, 20]);
    }

    #[test]
    fn test_ether() {
        assert_eq!(ether(1), U256::from(1_000_000_000_000_000_000u128));
    }
}
