//! Contract bindings for the Huma V2 protocol
//!
//! Only the functions the SDK calls are declared.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IPoolConfig {
        function receivableAsset() external view returns (address);
        function poolCredit() external view returns (address);
        function getFirstLossCover(uint256 index) external view returns (address);
    }

    #[sol(rpc)]
    interface IReceivable {
        function getReferenceIdHash(string referenceId, address creator) external view returns (bytes32);
        function referenceIdHashToTokenId(bytes32 referenceIdHash) external view returns (uint256);
        function getApproved(uint256 tokenId) external view returns (address);
        function approve(address to, uint256 tokenId) external;
    }

    /// Bound only for its address; approvals name it as the operator
    #[sol(rpc)]
    interface IPoolCredit {}

    #[sol(rpc)]
    interface IPool {
        function totalAssets() external view returns (uint256);
        function isPoolOn() external view returns (bool status);
        function trancheTotalAssets(uint256 index) external view returns (uint256);
    }

    #[sol(rpc)]
    interface ITrancheVault {
        function balanceOf(address account) external view returns (uint256);
        function convertToAssets(uint256 shares) external view returns (uint256);
    }

    #[sol(rpc)]
    interface IFirstLossCover {
        function totalAssets() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function convertToAssets(uint256 shares) external view returns (uint256);
    }
}

pub use IFirstLossCover::IFirstLossCoverInstance;
pub use IPool::IPoolInstance;
pub use IPoolConfig::IPoolConfigInstance;
pub use IPoolCredit::IPoolCreditInstance;
pub use IReceivable::IReceivableInstance;
pub use ITrancheVault::ITrancheVaultInstance;
