//! Utilities for the deploy and admin scripts.

use std::{str::FromStr, time::Duration};

use alloy::{
    eips::BlockNumberOrTag,
    network::TransactionBuilder,
    primitives::{Address, Bytes, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::debug;

use crate::{
    constants::{
        EVM_INCREASE_TIME_METHOD, EVM_MINE_METHOD, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT,
        RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL_MS,
    },
    errors::ScriptError,
};

/// A signing RPC client along with the identity it signs for
#[derive(Clone)]
pub struct Client {
    /// The provider, with the deployer's wallet attached
    pub provider: DynProvider,
    /// The address transactions are sent from
    pub sender: Address,
    /// The chain ID reported by the node
    pub chain_id: u64,
}

/// Sets up a signing client from the deployer's private key and the RPC url
pub async fn setup_client(priv_key: &str, rpc_url: &str) -> Result<Client, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let url =
        Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let sender = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(signer)
        .with_simple_nonce_management()
        .connect_http(url);
    let provider = DynProvider::new(provider);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    Ok(Client {
        provider,
        sender,
        chain_id,
    })
}

/// Parse a hex address from the command line
pub fn parse_address(s: &str) -> Result<Address, ScriptError> {
    Address::from_str(s).map_err(|e| ScriptError::CalldataConstruction(format!("{s}: {e}")))
}

/// Parse hex-encoded bytes from the command line
pub fn parse_hex_bytes(s: &str) -> Result<Bytes, ScriptError> {
    Bytes::from_str(s).map_err(|e| ScriptError::CalldataConstruction(format!("{s}: {e}")))
}

/// Parse a decimal or `0x`-prefixed integer from the command line
pub fn parse_u256(s: &str) -> Result<U256, ScriptError> {
    U256::from_str(s).map_err(|e| ScriptError::CalldataConstruction(format!("{s}: {e}")))
}

/// Parse a 32-byte hex value, e.g. an operation or request ID
pub fn parse_b256(s: &str) -> Result<B256, ScriptError> {
    B256::from_str(s).map_err(|e| ScriptError::CalldataConstruction(format!("{s}: {e}")))
}

/// A transaction calling `target` with the given calldata
pub fn call_request(target: Address, calldata: impl Into<Bytes>, value: U256) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(target)
        .with_input(calldata.into())
        .with_value(value)
}

/// Send a transaction and wait for a successful receipt
///
/// The receipt is polled for directly rather than watching the pending
/// transaction, which is unreliable against some devnets
pub async fn send_tx(
    client: &Client,
    tx: TransactionRequest,
) -> Result<TransactionReceipt, ScriptError> {
    let pending_tx = client
        .provider
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = *pending_tx.tx_hash();
    debug!("sent transaction {tx_hash:#x}");

    for _ in 0..RECEIPT_POLL_ATTEMPTS {
        let receipt = client
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        match receipt {
            Some(receipt) if receipt.status() => return Ok(receipt),
            Some(_) => return Err(ScriptError::TransactionReverted(format!("{tx_hash:#x}"))),
            None => tokio::time::sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await,
        }
    }

    Err(ScriptError::ContractInteraction(format!(
        "no receipt found for {tx_hash:#x}"
    )))
}

/// Send a contract creation transaction, returning the created address
pub async fn deploy_bytecode(client: &Client, creation_code: Bytes) -> Result<Address, ScriptError> {
    let tx = TransactionRequest::default().with_deploy_code(creation_code);
    let receipt = send_tx(client, tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "no contract address in receipt {:#x}",
            receipt.transaction_hash
        ))
    })
}

/// Extract the address stored in the low-order bytes of a storage slot
pub fn address_from_slot(value: U256) -> Address {
    let bytes = value.to_be_bytes::<NUM_BYTES_STORAGE_SLOT>();
    Address::from_slice(&bytes[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..])
}

/// Read an address out of a contract's storage slot, e.g. an EIP-1967 slot
pub async fn read_address_slot(
    client: &Client,
    contract: Address,
    slot: B256,
) -> Result<Address, ScriptError> {
    let value = client
        .provider
        .get_storage_at(contract, U256::from_be_bytes(slot.0))
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(address_from_slot(value))
}

/// The timestamp of the latest block
pub async fn latest_timestamp(client: &Client) -> Result<u64, ScriptError> {
    let block = client
        .provider
        .get_block_by_number(BlockNumberOrTag::Latest)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .ok_or_else(|| ScriptError::ContractInteraction("no latest block".to_string()))?;

    Ok(block.header.timestamp)
}

/// Move a development chain's clock forward and mine a block at the new time
pub async fn advance_time(client: &Client, seconds: u64) -> Result<(), ScriptError> {
    client
        .provider
        .raw_request::<_, serde_json::Value>(EVM_INCREASE_TIME_METHOD.into(), (seconds,))
        .await
        .map_err(|e| ScriptError::UnsupportedNetwork(e.to_string()))?;
    client
        .provider
        .raw_request::<_, serde_json::Value>(EVM_MINE_METHOD.into(), ())
        .await
        .map_err(|e| ScriptError::UnsupportedNetwork(e.to_string()))?;

    debug!("advanced chain time by {seconds}s");
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, U256};

    use super::{address_from_slot, call_request, parse_address, parse_hex_bytes, parse_u256};

    #[test]
    fn test_address_from_slot() {
        let address = Address::repeat_byte(0xab);
        let mut slot = [0u8; 32];
        slot[12..].copy_from_slice(address.as_slice());

        assert_eq!(address_from_slot(U256::from_be_bytes(slot)), address);
        assert_eq!(address_from_slot(U256::ZERO), Address::ZERO);
    }

    #[test]
    fn test_parse_address() {
        let parsed = parse_address("0x000000000000000000000000000000000000dead").unwrap();
        assert_eq!(parsed, Address::left_padding_from(&[0xde, 0xad]));
        assert!(parse_address("0xdead").is_err());
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(parse_hex_bytes("0x0102").unwrap().to_vec(), vec![1, 2]);
        assert!(parse_hex_bytes("0xzz").is_err());
    }

    #[test]
    fn test_parse_u256() {
        assert_eq!(parse_u256("1000").unwrap(), U256::from(1000u64));
        assert_eq!(parse_u256("0xff").unwrap(), U256::from(255u64));
        assert!(parse_u256("ten").is_err());
    }

    #[test]
    fn test_call_request() {
        let target = Address::repeat_byte(7);
        let tx = call_request(target, vec![1u8, 2], U256::from(3));

        assert_eq!(tx.to, Some(target.into()));
        assert_eq!(tx.value, Some(U256::from(3)));
        assert_eq!(tx.input.input().map(|b| b.to_vec()), Some(vec![1, 2]));
    }
}
