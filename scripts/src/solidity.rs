//! Definitions of the Solidity interfaces called by the scripts
//!
//! Only the methods the scripts and integration tests touch are declared here,
//! the contracts themselves live in the contracts repository.

use alloy::sol;

sol! {
    /// Methods shared by every access-controlled, pausable game contract
    #[sol(rpc)]
    interface IAccessControlled {
        function grantRole(bytes32 role, address account) external;
        function revokeRole(bytes32 role, address account) external;
        function renounceRole(bytes32 role, address account) external;
        function hasRole(bytes32 role, address account) external view returns (bool);
        function pause() external;
        function unpause() external;
        function paused() external view returns (bool);
    }

    /// The OpenZeppelin v4 `ProxyAdmin`
    #[sol(rpc)]
    interface IProxyAdmin {
        function upgrade(address proxy, address implementation) external;
        function upgradeAndCall(address proxy, address implementation, bytes memory data) external payable;
        function transferOwnership(address newOwner) external;
        function owner() external view returns (address);
    }

    /// The OpenZeppelin `TimelockController`
    #[sol(rpc)]
    interface ITimelockController {
        function schedule(address target, uint256 value, bytes calldata data, bytes32 predecessor, bytes32 salt, uint256 delay) external;
        function scheduleBatch(address[] calldata targets, uint256[] calldata values, bytes[] calldata payloads, bytes32 predecessor, bytes32 salt, uint256 delay) external;
        function execute(address target, uint256 value, bytes calldata payload, bytes32 predecessor, bytes32 salt) external payable;
        function executeBatch(address[] calldata targets, uint256[] calldata values, bytes[] calldata payloads, bytes32 predecessor, bytes32 salt) external payable;
        function cancel(bytes32 id) external;
        function getMinDelay() external view returns (uint256);
        function getTimestamp(bytes32 id) external view returns (uint256);
        function hasRole(bytes32 role, address account) external view returns (bool);
        function hashOperation(address target, uint256 value, bytes calldata data, bytes32 predecessor, bytes32 salt) external pure returns (bytes32);
        function hashOperationBatch(address[] calldata targets, uint256[] calldata values, bytes[] calldata payloads, bytes32 predecessor, bytes32 salt) external pure returns (bytes32);
    }

    /// The trait mutation probability tables
    #[sol(rpc)]
    interface IProperties {
        function initialize(uint8[4] chefProbabilities, uint8[4] ratProbabilities) external;
    }

    /// The chef / rat NFT
    #[sol(rpc)]
    interface ICharacter {
        struct CharacterInfo {
            bool isChef;
            uint8 efficiency;
            uint8 tolerance;
        }

        function initialize(address properties) external;
        function getCharacter(uint256 tokenId) external view returns (CharacterInfo memory);
        function balanceOf(address owner) external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);

        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
    }

    /// A capped, controller-minted food token
    #[sol(rpc)]
    interface IFoodToken {
        function initialize(string memory name, string memory symbol, uint256 maxSupply) external;
        function mint(address account, uint256 amount) external;
        function balanceOf(address account) external view returns (uint256);
    }

    /// Mint pricing and whitelist gating
    #[sol(rpc)]
    interface IPaywall {
        function initialize(uint256 mintPrice, bool onlyWhitelist) external;
        function setMintPrice(uint256 price) external;
        function toggleWhitelist(bool enabled) external;
        function addToWhitelist(address[] memory accounts) external;
        function removeFromWhitelist(address[] memory accounts) external;
        function addToFreeMints(address[] memory accounts) external;
        function mintPrice() external view returns (uint256);
        function onlyWhitelist() external view returns (bool);
        function whitelist(address account) external view returns (bool);
    }

    /// The VRF-backed mint entrypoint
    #[sol(rpc)]
    interface IMint {
        function initialize(address vrfCoordinator, address link, bytes32 keyHash, uint256 fee, address character, address paywall, uint256 maxSupply, uint8 maxMintsPerTx) external;
        function requestMint(uint8 amount) external payable returns (bytes32);
        function setMaxSupply(uint256 maxSupply) external;

        event RandomnessRequested(bytes32 indexed requestId, address indexed sender);
    }

    /// The VRF-backed claim entrypoint shared by the venues
    #[sol(rpc)]
    interface IClaim {
        function initialize(address vrfCoordinator, address link, bytes32 keyHash, uint256 fee, address character) external;

        event RandomnessRequested(bytes32 indexed requestId, address indexed sender);
    }

    /// A food kitchen, i.e. `McStake`, `TheStakehouse` or `LeStake`
    #[sol(rpc)]
    interface IKitchen {
        function initialize(
            address character,
            address claim,
            address foodToken,
            uint256 foodTokenMaxSupply,
            uint256 dailyChefEarnings,
            uint256 ratTheftPercentage,
            uint256 vestingPeriod,
            uint256 accrualPeriod,
            uint256 chefEfficiencyMultiplier,
            uint256 ratEfficiencyMultiplier,
            int256 ratEfficiencyOffset,
            uint256 maxClaimsPerTx
        ) external;
        function stake(uint16[] calldata tokenIds) external;
        function claimMany(uint16[] calldata tokenIds, bool unstake) external;
    }

    /// The tolerance training venue
    #[sol(rpc)]
    interface IGym {
        function initialize(address character, address claim, uint256 dailyToleranceGain, uint256 vestingPeriod, uint256 accrualPeriod) external;
    }

    /// Chainlink's `VRFCoordinatorMock`
    #[sol(rpc)]
    interface IVrfCoordinatorMock {
        function callBackWithRandomness(bytes32 requestId, uint256 randomness, address consumerContract) external;
    }

    /// Chainlink's `LinkToken`
    #[sol(rpc)]
    interface ILinkToken {
        function transfer(address to, uint256 value) external returns (bool);
        function balanceOf(address owner) external view returns (uint256);
    }
}
