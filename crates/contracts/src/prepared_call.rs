//! Transactions that are built but not yet sent.
//!
//! Every write the executor performs goes through `PreparedCall`, so the
//! caller can inspect the target and calldata (for a dry run) before
//! `send()` submits it and waits for the receipt.

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;
use tracing::{debug, info};

use crate::error::{ContractError, Result};
use crate::provider::HttpProvider;

/// A transaction that can be inspected or executed.
///
/// # Example
///
/// ```rust,ignore
/// let call = executor.approve(collateral, peg_token, amount);
/// println!("{} -> {}", call.label(), call.to());
/// let receipt = call.send().await?;
/// ```
pub struct PreparedCall<'a, C: SolCall> {
    to: Address,
    call: C,
    value: U256,
    provider: &'a HttpProvider,
}

impl<'a, C: SolCall> PreparedCall<'a, C> {
    pub fn new(to: Address, call: C, value: U256, provider: &'a HttpProvider) -> Self {
        Self {
            to,
            call,
            value,
            provider,
        }
    }

    /// Consumes self and returns `(address, call)`.
    pub fn prepare(self) -> (Address, C) {
        (self.to, self.call)
    }

    /// Returns the target address for this call.
    pub fn to(&self) -> Address {
        self.to
    }

    /// Returns the native value sent with this call.
    pub fn value(&self) -> U256 {
        self.value
    }

    /// The Solidity signature of the call, e.g. `approve(address,uint256)`.
    pub fn label(&self) -> &'static str {
        C::SIGNATURE
    }

    /// ABI-encoded calldata.
    pub fn calldata(&self) -> Bytes {
        self.call.abi_encode().into()
    }

    /// Sends the transaction and waits for the receipt.
    ///
    /// A mined transaction whose receipt reports failure is an error.
    pub async fn send(self) -> Result<TransactionReceipt> {
        let tx = TransactionRequest::default()
            .to(self.to)
            .input(self.calldata().into())
            .value(self.value);

        debug!(to = %self.to, call = C::SIGNATURE, "submitting transaction");
        let pending = self.provider.send_transaction(tx).await.map_err(|e| {
            ContractError::TransactionFailed(format!("Failed to send {}: {}", C::SIGNATURE, e))
        })?;

        let receipt = pending.get_receipt().await.map_err(|e| {
            ContractError::TransactionFailed(format!("Failed to get receipt: {}", e))
        })?;

        if !receipt.status() {
            return Err(ContractError::Reverted(receipt.transaction_hash));
        }
        info!(
            tx = %receipt.transaction_hash,
            call = C::SIGNATURE,
            gas_used = receipt.gas_used,
            "transaction confirmed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erc20::IERC20;
    use crate::peg_token::IPegToken;
    use crate::provider::connect_read_only;

    fn create_test_provider() -> HttpProvider {
        connect_read_only("http://localhost:8545").unwrap()
    }

    #[test]
    fn test_accessors() {
        let provider = create_test_provider();
        let target = Address::repeat_byte(0x42);
        let call = IPegToken::mintTokensCall {
            tokenAmount: U256::from(100),
        };

        let prepared = PreparedCall::new(target, call, U256::ZERO, &provider);

        assert_eq!(prepared.to(), target);
        assert_eq!(prepared.value(), U256::ZERO);
        assert_eq!(prepared.label(), "mintTokens(uint256)");
    }

    #[test]
    fn test_calldata_starts_with_selector() {
        let provider = create_test_provider();
        let call = IERC20::approveCall {
            spender: Address::repeat_byte(0x01),
            amount: U256::from(5),
        };

        let prepared = PreparedCall::new(Address::repeat_byte(0x42), call, U256::ZERO, &provider);
        let calldata = prepared.calldata();

        assert_eq!(&calldata[..4], IERC20::approveCall::SELECTOR.as_slice());
        assert_eq!(calldata.len(), 4 + 32 * 2);
    }

    #[test]
    fn test_prepare_returns_address_and_call_tuple() {
        let provider = create_test_provider();
        let target = Address::repeat_byte(0x42);
        let call = IPegToken::burnTokensCall {
            tokenAmount: U256::from(7),
        };

        let (addr, returned) = PreparedCall::new(target, call, U256::ZERO, &provider).prepare();

        assert_eq!(addr, target);
        assert_eq!(returned.tokenAmount, U256::from(7));
    }
}
