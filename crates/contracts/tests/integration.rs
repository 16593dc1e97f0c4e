//! Integration tests for the contracts crate.

use alloy::primitives::Address;
use pegkeeper_contracts::{ChainReader, ContractError, NetworkConfig, PegExecutor};
use pegkeeper_model::PegParameters;

const PRIVATE_KEY: &str = "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

fn local_network() -> NetworkConfig {
    NetworkConfig::bsc_mainnet(Address::repeat_byte(0x47)).with_rpc_url("http://localhost:8545")
}

#[test]
fn test_executor_construction_with_valid_inputs() {
    let result = PegExecutor::new(local_network(), PRIVATE_KEY, PegParameters::default());
    assert!(result.is_ok());

    let executor = result.unwrap();
    assert!(!executor.signer_address().is_zero());
}

#[test]
fn test_executor_invalid_rpc_url() {
    let network = local_network().with_rpc_url("not a url");
    let result = PegExecutor::new(network, PRIVATE_KEY, PegParameters::default());
    assert!(matches!(result, Err(ContractError::RpcConnection(_))));
}

#[test]
fn test_error_conversion() {
    fn fallible() -> pegkeeper_contracts::Result<()> {
        let _executor = PegExecutor::new(local_network(), "invalid", PegParameters::default())?;
        Ok(())
    }

    assert!(fallible().is_err());
}

#[test]
fn test_reader_and_executor_share_network() {
    let reader = ChainReader::new(local_network()).unwrap();
    let executor = PegExecutor::new(local_network(), PRIVATE_KEY, PegParameters::default()).unwrap();
    assert_eq!(reader.network(), executor.reader().network());
}

#[tokio::test]
async fn test_unreachable_node_surfaces_read_error() {
    // Nothing listens on port 9; the read fails fast.
    let network = local_network().with_rpc_url("http://127.0.0.1:9");
    let reader = ChainReader::new(network).unwrap();
    let result = reader.contract_info().await;
    assert!(matches!(result, Err(ContractError::ReadFailed(_))));
}
