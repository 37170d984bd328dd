//! Migration 6: mint pricing and the whitelist, through the admin route

use alloy::{
    primitives::{Address, Bytes},
    sol_types::SolCall,
};
use itertools::Itertools;

use crate::{
    config::{GameConfig, PaywallConfig},
    context::DeployContext,
    errors::ScriptError,
    solidity::IPaywall,
    types::GameContract,
};

pub(super) async fn run(ctx: &mut DeployContext, config: &GameConfig) -> Result<(), ScriptError> {
    let paywall = ctx.address(GameContract::Paywall)?;
    let calls = pricing_calls(paywall, &config.paywall);

    ctx.admin_call_batch(calls, &describe(&config.paywall)).await
}

/// The paywall calls applying the configured pricing
fn pricing_calls(paywall: Address, config: &PaywallConfig) -> Vec<(Address, Bytes)> {
    let mut calls: Vec<Bytes> = vec![
        IPaywall::setMintPriceCall {
            price: config.mint_price,
        }
        .abi_encode()
        .into(),
        IPaywall::toggleWhitelistCall {
            enabled: config.only_whitelist,
        }
        .abi_encode()
        .into(),
    ];

    if !config.whitelist.is_empty() {
        calls.push(
            IPaywall::addToWhitelistCall {
                accounts: config.whitelist.clone(),
            }
            .abi_encode()
            .into(),
        );
    }
    if !config.free_mints.is_empty() {
        calls.push(
            IPaywall::addToFreeMintsCall {
                accounts: config.free_mints.clone(),
            }
            .abi_encode()
            .into(),
        );
    }

    calls.into_iter().map(|data| (paywall, data)).collect()
}

/// A description naming every argument, so a changed config is a new operation
fn describe(config: &PaywallConfig) -> String {
    let fmt_accounts = |accounts: &[Address]| accounts.iter().map(|a| format!("{a:#x}")).join(",");

    format!(
        "paywall pricing: price {} wei, whitelist only {}, whitelist [{}], free mints [{}]",
        config.mint_price,
        config.only_whitelist,
        fmt_accounts(&config.whitelist),
        fmt_accounts(&config.free_mints),
    )
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{Address, U256},
        sol_types::SolCall,
    };

    use super::{describe, pricing_calls};
    use crate::{config::PaywallConfig, solidity::IPaywall};

    fn paywall_config() -> PaywallConfig {
        PaywallConfig {
            mint_price: U256::from(1000u64),
            only_whitelist: true,
            whitelist: vec![],
            free_mints: vec![],
        }
    }

    #[test]
    fn test_skips_empty_lists() {
        let paywall = Address::repeat_byte(7);
        let calls = pricing_calls(paywall, &paywall_config());

        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(target, _)| *target == paywall));
        assert_eq!(calls[0].1[..4], IPaywall::setMintPriceCall::SELECTOR);
        assert_eq!(calls[1].1[..4], IPaywall::toggleWhitelistCall::SELECTOR);
    }

    #[test]
    fn test_includes_lists() {
        let mut config = paywall_config();
        config.whitelist = vec![Address::repeat_byte(1)];
        config.free_mints = vec![Address::repeat_byte(2)];

        let calls = pricing_calls(Address::repeat_byte(7), &config);
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[2].1[..4], IPaywall::addToWhitelistCall::SELECTOR);
        assert_eq!(calls[3].1[..4], IPaywall::addToFreeMintsCall::SELECTOR);
    }

    #[test]
    fn test_description_tracks_config() {
        let config = paywall_config();
        let mut changed = config.clone();
        changed.whitelist.push(Address::repeat_byte(1));

        assert_eq!(describe(&config), describe(&config.clone()));
        assert_ne!(describe(&config), describe(&changed));
    }
}
