//! Provider construction for readers and signers.

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};

use crate::error::{ContractError, Result};

/// The provider type used by readers and the executor.
///
/// Type-erased so read-only and wallet-backed providers share one type.
pub type HttpProvider = DynProvider;

fn parse_url(rpc_url: &str) -> Result<url::Url> {
    rpc_url
        .parse()
        .map_err(|e| ContractError::RpcConnection(format!("{}", e)))
}

/// Build a read-only provider.
pub fn connect_read_only(rpc_url: &str) -> Result<HttpProvider> {
    let url = parse_url(rpc_url)?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// Build a wallet-backed provider. Returns the provider and the signer address.
pub fn connect_with_signer(rpc_url: &str, private_key: &str) -> Result<(HttpProvider, Address)> {
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|_| ContractError::InvalidPrivateKey)?;
    let signer_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    let url = parse_url(rpc_url)?;
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();

    Ok((provider, signer_address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    // Anvil's default account 0 private key
    const TEST_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_signer_address_derived_from_key() {
        let (_, signer) = connect_with_signer("http://localhost:8545", TEST_PRIVATE_KEY).unwrap();
        assert_eq!(signer, address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_invalid_private_key() {
        let result = connect_with_signer("http://localhost:8545", "not-a-valid-key");
        assert!(matches!(result, Err(ContractError::InvalidPrivateKey)));
    }

    #[test]
    fn test_invalid_rpc_url() {
        assert!(matches!(connect_read_only("not a url"), Err(ContractError::RpcConnection(_))));
        let result = connect_with_signer("not a url", TEST_PRIVATE_KEY);
        assert!(matches!(result, Err(ContractError::RpcConnection(_))));
    }
}
