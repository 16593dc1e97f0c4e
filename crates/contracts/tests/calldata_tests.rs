//! Calldata encoding tests.
//!
//! These verify selectors and argument layout for every call the executor
//! submits, without an RPC connection.

use alloy::primitives::{address, keccak256, Address, U256};
use alloy::sol_types::SolCall;
use pegkeeper_contracts::erc20::IERC20;
use pegkeeper_contracts::executor::{deadline, min_with_slippage};
use pegkeeper_contracts::peg_token::IPegToken;
use pegkeeper_contracts::uniswap_v2::{IUniswapV2Pair, IUniswapV2Router};
use pegkeeper_contracts::{NetworkConfig, PegExecutor};
use pegkeeper_model::PegParameters;

const TEST_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const EXPECTED_SIGNER_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const PEG_TOKEN: Address = address!("47b38b895A2d6E90fACE5619E85D3278dDd86476");

fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn test_executor() -> PegExecutor {
    let network = NetworkConfig::bsc_mainnet(PEG_TOKEN).with_rpc_url("http://localhost:8545");
    PegExecutor::new(network, TEST_PRIVATE_KEY, PegParameters::default()).unwrap()
}

#[test]
fn test_signer_address() {
    assert_eq!(test_executor().signer_address(), EXPECTED_SIGNER_ADDRESS);
}

#[test]
fn test_peg_token_selectors() {
    assert_eq!(IPegToken::mintTokensCall::SELECTOR, selector("mintTokens(uint256)"));
    assert_eq!(IPegToken::burnTokensCall::SELECTOR, selector("burnTokens(uint256)"));
    assert_eq!(IPegToken::getContractInfoCall::SELECTOR, selector("getContractInfo()"));
    assert_eq!(
        IPegToken::calculateCollateralNeededCall::SELECTOR,
        selector("calculateCollateralNeeded(uint256)")
    );
    assert_eq!(IPegToken::calculateUSDTReturnCall::SELECTOR, selector("calculateUSDTReturn(uint256)"));
}

#[test]
fn test_router_selectors() {
    assert_eq!(
        IUniswapV2Router::addLiquidityCall::SELECTOR,
        selector("addLiquidity(address,address,uint256,uint256,uint256,uint256,address,uint256)")
    );
    assert_eq!(
        IUniswapV2Router::removeLiquidityCall::SELECTOR,
        selector("removeLiquidity(address,address,uint256,uint256,uint256,address,uint256)")
    );
    assert_eq!(IUniswapV2Pair::getReservesCall::SELECTOR, selector("getReserves()"));
}

#[test]
fn test_mint_calldata_encodes_amount() {
    let executor = test_executor();
    let amount = U256::from(10u64).pow(U256::from(18));
    let calldata = executor.mint_call(amount).calldata();

    assert_eq!(&calldata[..4], &selector("mintTokens(uint256)"));
    assert_eq!(U256::from_be_slice(&calldata[4..36]), amount);
}

#[test]
fn test_burn_call_targets_peg_token() {
    let executor = test_executor();
    let call = executor.burn_call(U256::from(5));
    assert_eq!(call.to(), PEG_TOKEN);
    assert_eq!(call.value(), U256::ZERO);
}

#[test]
fn test_approve_calldata() {
    let executor = test_executor();
    let spender = address!("10ED43C718714eb63d5aA57B78B54704E256024E");
    let token = address!("55d398326f99059fF775485246999027B3197955");
    let call = executor.approve(token, spender, U256::from(42));

    assert_eq!(call.to(), token);
    let calldata = call.calldata();
    assert_eq!(&calldata[..4], &IERC20::approveCall::SELECTOR);
    assert_eq!(&calldata[16..36], spender.as_slice());
    assert_eq!(U256::from_be_slice(&calldata[36..68]), U256::from(42));
}

#[test]
fn test_add_liquidity_argument_layout() {
    let call = IUniswapV2Router::addLiquidityCall {
        tokenA: PEG_TOKEN,
        tokenB: Address::repeat_byte(0x55),
        amountADesired: U256::from(4_000),
        amountBDesired: U256::from(44_000),
        amountAMin: min_with_slippage(U256::from(4_000), 100),
        amountBMin: min_with_slippage(U256::from(44_000), 100),
        to: EXPECTED_SIGNER_ADDRESS,
        deadline: deadline(1_700_000_000),
    };
    let encoded = call.abi_encode();

    assert_eq!(encoded.len(), 4 + 32 * 8);
    assert_eq!(U256::from_be_slice(&encoded[4 + 32 * 4..4 + 32 * 5]), U256::from(3_960));
    assert_eq!(U256::from_be_slice(&encoded[4 + 32 * 5..4 + 32 * 6]), U256::from(43_560));
    assert_eq!(U256::from_be_slice(&encoded[4 + 32 * 7..]), U256::from(1_700_001_200u64));
}
