//! Collateral-backed peg token interface.
//!
//! `mintTokens` pulls collateral from the caller via `transferFrom`, so the
//! collateral token must be approved for the peg token contract first.
//! `calculateUSDTReturn` keeps its deployed name; the selector depends on it.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IPegToken {
        function getContractInfo() external view returns (
            uint256 totalSupply,
            uint256 totalCollateral,
            uint256 reserveRatio,
            uint256 collateralizationRatio
        );
        function calculateCollateralNeeded(uint256 tokenAmount) external view returns (uint256);
        function calculateUSDTReturn(uint256 tokenAmount) external view returns (uint256);
        function mintTokens(uint256 tokenAmount) external;
        function burnTokens(uint256 tokenAmount) external;
    }
}
