//! Definitions of CLI arguments and commands for the deploy and admin scripts

use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::{
    admin::{SaltPolicy, TimelockSettings},
    commands::{
        balance, character, free_mints, fulfill_randomness, gen_config, grant_role, migrate,
        pause, revoke_role, set_max_supply, set_mint_price, status, timelock_cancel,
        timelock_execute, timelock_propose, timelock_status, toggle_whitelist, unpause, upgrade,
        whitelist,
    },
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIG_PATH, DEFAULT_DEPLOYMENTS_PATH,
        DEFAULT_DEVNET_PKEY, DEFAULT_DEVNET_RPC_URL, DEFAULT_POLL_INTERVAL_SECS,
        DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_PROPOSALS_DIR,
    },
    errors::ScriptError,
    timelock::WaitStrategy,
    types::{GameContract, Network, Role},
};

/// The deploy and admin scripts' command line
#[derive(Parser)]
#[command(about = "Deploy and administer the kitchen game contracts")]
pub struct Cli {
    /// Arguments shared by every command
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by every command
#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY", default_value = DEFAULT_DEVNET_PKEY, hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_DEVNET_RPC_URL)]
    pub rpc_url: String,

    /// Path of the deployments file
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments: PathBuf,

    /// Path of the game config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory of compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Directory in which deferred timelock proposals are written
    #[arg(long, default_value = DEFAULT_PROPOSALS_DIR)]
    pub proposals: PathBuf,

    /// How to wait out the timelock delay
    #[arg(long, value_enum, default_value_t = WaitKind::AdvanceTime)]
    pub wait: WaitKind,

    /// Seconds between readiness checks with `--wait poll`
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Seconds to wait with `--wait poll` before deferring
    #[arg(long, default_value_t = DEFAULT_POLL_TIMEOUT_SECS)]
    pub poll_timeout_secs: u64,

    /// Delay requested for new timelock operations, raised to the timelock's minimum
    #[arg(long, default_value_t = 0)]
    pub timelock_delay: u64,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// The wait strategy selected on the command line
    pub fn wait_strategy(&self) -> WaitStrategy {
        match self.wait {
            WaitKind::AdvanceTime => WaitStrategy::AdvanceTime,
            WaitKind::Poll => WaitStrategy::Poll {
                interval: Duration::from_secs(self.poll_interval_secs),
                timeout: Duration::from_secs(self.poll_timeout_secs),
            },
            WaitKind::Defer => WaitStrategy::Defer,
        }
    }

    /// The timelock settings selected on the command line
    ///
    /// One-off commands get fresh salts, so repeating an action is a new operation
    pub fn timelock_settings(&self) -> TimelockSettings {
        TimelockSettings {
            delay: self.timelock_delay,
            wait: self.wait_strategy(),
            proposals_dir: self.proposals.clone(),
            salts: SaltPolicy::Fresh,
        }
    }
}

/// How to wait out the timelock delay
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitKind {
    /// Advance the chain's clock, development chains only
    AdvanceTime,
    /// Sleep until the operation is ready
    Poll,
    /// Write a proposal file and execute on a later run
    Defer,
}

/// The commands the scripts run
#[derive(Subcommand)]
pub enum Command {
    /// Write the preset game config for a network
    GenConfig(GenConfigArgs),
    /// Run pending migrations
    Migrate(MigrateArgs),
    /// Print the deployment record, refreshing implementations from chain
    Status,
    /// Upgrade a proxied contract to a freshly deployed implementation
    Upgrade(UpgradeArgs),
    /// Pause a game contract
    Pause(ContractArgs),
    /// Unpause a game contract
    Unpause(ContractArgs),
    /// Grant a role on a game contract
    GrantRole(RoleArgs),
    /// Revoke a role on a game contract
    RevokeRole(RoleArgs),
    /// Set the price of a single mint
    SetMintPrice(SetMintPriceArgs),
    /// Set the maximum number of characters ever minted
    SetMaxSupply(SetMaxSupplyArgs),
    /// Enforce or lift the mint whitelist
    ToggleWhitelist(ToggleWhitelistArgs),
    /// Add accounts to, or remove them from, the mint whitelist
    Whitelist(WhitelistArgs),
    /// Grant accounts a free mint
    FreeMints(AccountsArgs),
    /// Deliver randomness to a VRF consumer through the coordinator mock
    FulfillRandomness(FulfillRandomnessArgs),
    /// Print a character's traits
    Character(CharacterArgs),
    /// Print an account's characters and food token balances
    Balance(BalanceArgs),
    /// Inspect and drive timelock operations
    #[command(subcommand)]
    Timelock(TimelockCommand),
}

impl Command {
    /// Run the command
    pub async fn run(self, global: &GlobalArgs) -> Result<(), ScriptError> {
        match self {
            Command::GenConfig(args) => gen_config(args, global),
            Command::Migrate(args) => migrate(args, global).await,
            Command::Status => status(global).await,
            Command::Upgrade(args) => upgrade(args, global).await,
            Command::Pause(args) => pause(args, global).await,
            Command::Unpause(args) => unpause(args, global).await,
            Command::GrantRole(args) => grant_role(args, global).await,
            Command::RevokeRole(args) => revoke_role(args, global).await,
            Command::SetMintPrice(args) => set_mint_price(args, global).await,
            Command::SetMaxSupply(args) => set_max_supply(args, global).await,
            Command::ToggleWhitelist(args) => toggle_whitelist(args, global).await,
            Command::Whitelist(args) => whitelist(args, global).await,
            Command::FreeMints(args) => free_mints(args, global).await,
            Command::FulfillRandomness(args) => fulfill_randomness(args, global).await,
            Command::Character(args) => character(args, global).await,
            Command::Balance(args) => balance(args, global).await,
            Command::Timelock(command) => command.run(global).await,
        }
    }
}

/// Write a network's preset config, to be edited before migrating
#[derive(Args)]
pub struct GenConfigArgs {
    /// The network to generate the config for
    #[arg(short, long, value_enum)]
    pub network: Network,

    /// Where to write the config; the global `--config` path when omitted
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Run pending migrations
#[derive(Args)]
pub struct MigrateArgs {
    /// The last migration to run; all pending migrations when omitted
    #[arg(long)]
    pub to: Option<u32>,

    /// List the pending migrations without sending any transaction
    #[arg(long)]
    pub dry_run: bool,
}

/// Upgrade a proxied contract
#[derive(Args)]
pub struct UpgradeArgs {
    /// The contract to upgrade
    #[arg(short, long, value_enum)]
    pub contract: GameContract,

    /// Optional calldata, in hex form, with which to
    /// call the new implementation when upgrading
    #[arg(long)]
    pub calldata: Option<String>,
}

/// A single game contract
#[derive(Args)]
pub struct ContractArgs {
    /// The contract to act on
    #[arg(short, long, value_enum)]
    pub contract: GameContract,
}

/// A role assignment
#[derive(Args)]
pub struct RoleArgs {
    /// The contract holding the role
    #[arg(short, long, value_enum)]
    pub contract: GameContract,

    /// The role
    #[arg(long, value_enum)]
    pub role: Role,

    /// The account, in hex
    #[arg(short, long)]
    pub account: String,
}

/// Set the mint price
#[derive(Args)]
pub struct SetMintPriceArgs {
    /// The price of a single mint, in wei
    pub price: String,
}

/// Set the mint's maximum supply
#[derive(Args)]
pub struct SetMaxSupplyArgs {
    /// The maximum number of characters ever minted
    pub max_supply: u64,
}

/// Enforce or lift the mint whitelist
#[derive(Args)]
pub struct ToggleWhitelistArgs {
    /// Whether only whitelisted accounts may mint
    #[arg(action = ArgAction::Set)]
    pub enabled: bool,
}

/// Edit the mint whitelist
#[derive(Args)]
pub struct WhitelistArgs {
    /// The accounts, in hex
    #[arg(required = true)]
    pub accounts: Vec<String>,

    /// Remove the accounts instead of adding them
    #[arg(long)]
    pub remove: bool,
}

/// A list of accounts
#[derive(Args)]
pub struct AccountsArgs {
    /// The accounts, in hex
    #[arg(required = true)]
    pub accounts: Vec<String>,
}

/// Deliver VRF randomness on a development chain
#[derive(Args)]
pub struct FulfillRandomnessArgs {
    /// The request ID emitted with `RandomnessRequested`
    #[arg(long)]
    pub request_id: String,

    /// The consumer that made the request
    #[arg(short, long, value_enum, default_value_t = GameContract::Mint)]
    pub consumer: GameContract,

    /// The randomness to deliver; random when omitted
    #[arg(long)]
    pub randomness: Option<String>,
}

/// Read a character
#[derive(Args)]
pub struct CharacterArgs {
    /// The character's token ID
    pub token_id: u64,
}

/// Read an account's holdings
#[derive(Args)]
pub struct BalanceArgs {
    /// The account, in hex; the deployer when omitted
    #[arg(short, long)]
    pub account: Option<String>,
}

/// Timelock operations
#[derive(Subcommand)]
pub enum TimelockCommand {
    /// Print the state of an operation
    Status(OperationArgs),
    /// Execute a ready operation from its proposal file
    Execute(ExecuteArgs),
    /// Cancel a pending operation
    Cancel(OperationArgs),
    /// Write a proposal for an arbitrary call, optionally scheduling it
    Propose(ProposeArgs),
}

impl TimelockCommand {
    /// Run the timelock command
    pub async fn run(self, global: &GlobalArgs) -> Result<(), ScriptError> {
        match self {
            TimelockCommand::Status(args) => timelock_status(args, global).await,
            TimelockCommand::Execute(args) => timelock_execute(args, global).await,
            TimelockCommand::Cancel(args) => timelock_cancel(args, global).await,
            TimelockCommand::Propose(args) => timelock_propose(args, global).await,
        }
    }
}

/// A timelock operation
#[derive(Args)]
pub struct OperationArgs {
    /// The operation ID, in hex
    pub id: String,
}

/// Execute a proposal
#[derive(Args)]
pub struct ExecuteArgs {
    /// Path of the proposal file
    pub proposal: PathBuf,
}

/// Propose a call through the timelock
#[derive(Args)]
pub struct ProposeArgs {
    /// The contract to call
    #[arg(short, long, value_enum)]
    pub contract: GameContract,

    /// The calldata, in hex
    #[arg(long)]
    pub calldata: String,

    /// A description of the call; also seeds the operation's salt
    #[arg(short, long)]
    pub description: String,

    /// Schedule the operation from the deployer, which must be a proposer
    #[arg(long)]
    pub schedule: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command, TimelockCommand, WaitKind};
    use crate::{
        constants::{DEFAULT_DEPLOYMENTS_PATH, DEFAULT_DEVNET_RPC_URL},
        timelock::WaitStrategy,
        types::{GameContract, Role},
    };

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_defaults() {
        let cli = Cli::try_parse_from(["kitchen-scripts", "status"]).unwrap();
        assert_eq!(cli.global.rpc_url, DEFAULT_DEVNET_RPC_URL);
        assert_eq!(
            cli.global.deployments.to_str(),
            Some(DEFAULT_DEPLOYMENTS_PATH)
        );
        assert_eq!(cli.global.wait, WaitKind::AdvanceTime);
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn test_poll_wait_strategy() {
        let cli = Cli::try_parse_from([
            "kitchen-scripts",
            "--wait",
            "poll",
            "--poll-interval-secs",
            "2",
            "--poll-timeout-secs",
            "30",
            "status",
        ])
        .unwrap();

        match cli.global.wait_strategy() {
            WaitStrategy::Poll { interval, timeout } => {
                assert_eq!(interval.as_secs(), 2);
                assert_eq!(timeout.as_secs(), 30);
            }
            other => panic!("unexpected wait strategy {other:?}"),
        }
    }

    #[test]
    fn test_grant_role_args() {
        let cli = Cli::try_parse_from([
            "kitchen-scripts",
            "grant-role",
            "--contract",
            "fast-food",
            "--role",
            "controller",
            "--account",
            "0x000000000000000000000000000000000000dead",
        ])
        .unwrap();

        match cli.command {
            Command::GrantRole(args) => {
                assert_eq!(args.contract, GameContract::FastFood);
                assert_eq!(args.role, Role::Controller);
            }
            _ => panic!("expected grant-role"),
        }
    }

    #[test]
    fn test_migrate_args() {
        let cli =
            Cli::try_parse_from(["kitchen-scripts", "migrate", "--to", "3", "--dry-run"]).unwrap();
        match cli.command {
            Command::Migrate(args) => {
                assert_eq!(args.to, Some(3));
                assert!(args.dry_run);
            }
            _ => panic!("expected migrate"),
        }
    }

    #[test]
    fn test_toggle_whitelist_takes_a_value() {
        let cli = Cli::try_parse_from(["kitchen-scripts", "toggle-whitelist", "false"]).unwrap();
        match cli.command {
            Command::ToggleWhitelist(args) => assert!(!args.enabled),
            _ => panic!("expected toggle-whitelist"),
        }
    }

    #[test]
    fn test_whitelist_requires_accounts() {
        assert!(Cli::try_parse_from(["kitchen-scripts", "whitelist", "--remove"]).is_err());
    }

    #[test]
    fn test_timelock_subcommands() {
        let cli = Cli::try_parse_from([
            "kitchen-scripts",
            "timelock",
            "execute",
            "proposals/0xab.json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Timelock(TimelockCommand::Execute(_))
        ));
    }
}
