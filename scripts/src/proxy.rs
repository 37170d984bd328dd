//! Helpers for OpenZeppelin transparent proxies.
//!
//! Every proxy is a [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/4.x/api/proxy#TransparentUpgradeableProxy)
//! administered by a single shared `ProxyAdmin`. Calls made directly to the proxy are forwarded
//! to the implementation contract, upgrades can only be made through the `ProxyAdmin`.

use alloy::{
    primitives::{Address, Bytes},
    sol_types::{SolCall, SolValue},
};

use crate::{
    constants::{PROXY_ADMIN_STORAGE_SLOT, PROXY_IMPLEMENTATION_STORAGE_SLOT},
    errors::ScriptError,
    solidity::IProxyAdmin,
    utils::{read_address_slot, Client},
};

/// The artifact name of the proxy contract
pub const PROXY_ARTIFACT_NAME: &str = "TransparentUpgradeableProxy";

/// ABI-encoded `TransparentUpgradeableProxy(logic, admin, data)` constructor arguments
pub fn proxy_constructor_args(implementation: Address, proxy_admin: Address, init_calldata: Bytes) -> Vec<u8> {
    (implementation, proxy_admin, init_calldata).abi_encode_params()
}

/// Calldata for the `ProxyAdmin` upgrading `proxy` to `implementation`,
/// calling into the new implementation when `calldata` is given
pub fn upgrade_calldata(proxy: Address, implementation: Address, calldata: Option<Bytes>) -> Bytes {
    match calldata {
        Some(data) if !data.is_empty() => IProxyAdmin::upgradeAndCallCall {
            proxy,
            implementation,
            data,
        }
        .abi_encode(),
        _ => IProxyAdmin::upgradeCall {
            proxy,
            implementation,
        }
        .abi_encode(),
    }
    .into()
}

/// The `(proxy, implementation)` pair that `ProxyAdmin` calldata upgrades,
/// if it is an upgrade at all
pub fn decode_upgrade(calldata: &[u8]) -> Option<(Address, Address)> {
    if let Ok(call) = IProxyAdmin::upgradeCall::abi_decode(calldata) {
        return Some((call.proxy, call.implementation));
    }

    IProxyAdmin::upgradeAndCallCall::abi_decode(calldata)
        .ok()
        .map(|call| (call.proxy, call.implementation))
}

/// The implementation a proxy currently delegates to
///
/// This is read from the EIP-1967 implementation slot
pub async fn implementation_of(client: &Client, proxy: Address) -> Result<Address, ScriptError> {
    read_address_slot(client, proxy, PROXY_IMPLEMENTATION_STORAGE_SLOT).await
}

/// The admin of a proxy
///
/// This is the recommended way to get the proxy admin address:
/// https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v4.9.0/contracts/proxy/ERC1967/ERC1967Upgrade.sol#L114-L116
pub async fn admin_of(client: &Client, proxy: Address) -> Result<Address, ScriptError> {
    read_address_slot(client, proxy, PROXY_ADMIN_STORAGE_SLOT).await
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{Address, Bytes},
        sol_types::SolCall,
    };

    use super::{decode_upgrade, proxy_constructor_args, upgrade_calldata};
    use crate::solidity::IProxyAdmin;

    #[test]
    fn test_upgrade_without_calldata() {
        let data = upgrade_calldata(Address::repeat_byte(1), Address::repeat_byte(2), None);
        assert_eq!(data[..4], IProxyAdmin::upgradeCall::SELECTOR);

        // Empty calldata is treated as no calldata
        let data = upgrade_calldata(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            Some(Bytes::new()),
        );
        assert_eq!(data[..4], IProxyAdmin::upgradeCall::SELECTOR);
    }

    #[test]
    fn test_upgrade_with_calldata() {
        let data = upgrade_calldata(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            Some(Bytes::from(vec![0xab])),
        );
        assert_eq!(data[..4], IProxyAdmin::upgradeAndCallCall::SELECTOR);
    }

    #[test]
    fn test_proxy_constructor_args_layout() {
        let implementation = Address::repeat_byte(1);
        let admin = Address::repeat_byte(2);
        let args = proxy_constructor_args(implementation, admin, Bytes::from(vec![0xff]));

        // Two static words, the offset of `data`, its length and one padded word
        assert_eq!(args.len(), 5 * 32);
        assert_eq!(&args[12..32], implementation.as_slice());
        assert_eq!(&args[44..64], admin.as_slice());
        assert_eq!(args[127], 1);
        assert_eq!(args[128], 0xff);
    }

    #[test]
    fn test_decode_upgrade() {
        let proxy = Address::repeat_byte(1);
        let implementation = Address::repeat_byte(2);

        let plain = upgrade_calldata(proxy, implementation, None);
        assert_eq!(decode_upgrade(&plain), Some((proxy, implementation)));

        let with_call = upgrade_calldata(proxy, implementation, Some(Bytes::from(vec![0xab])));
        assert_eq!(decode_upgrade(&with_call), Some((proxy, implementation)));

        let transfer = IProxyAdmin::transferOwnershipCall { newOwner: proxy }.abi_encode();
        assert_eq!(decode_upgrade(&transfer), None);
    }
}
