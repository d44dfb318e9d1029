//! Multicall aggregator contract interface.

use alloy::sol;

sol! {
    /// The aggregator interface, ABI compatible with the deployed `TronMulticall` contract.
    #[derive(Debug, PartialEq, Eq)]
    interface ITronMulticall {
        /// A single call in a batch.
        struct Call {
            /// Target contract address.
            address target;
            /// Encoded function call data.
            bytes callData;
        }

        /// Outcome of a single call in a batch.
        struct Result {
            /// Whether the call was successful.
            bool success;
            /// The return data, or the revert data if the call failed.
            bytes returnData;
        }

        /// Executes every call in order, recording failures instead of reverting.
        function aggregate(Call[] memory calls) external returns (uint256 blockNumber, Result[] memory returnData);

        /// Like `aggregate`, but reverts on the first failed call if `requireSuccess` is set.
        function tryAggregate(bool requireSuccess, Call[] memory calls) external returns (Result[] memory returnData);

        /// Like `aggregate`, additionally returning the hash of the parent block.
        function blockAndAggregate(Call[] memory calls) external returns (uint256 blockNumber, bytes32 blockHash, Result[] memory returnData);

        /// Executes every payload against the aggregator itself; any failure reverts the batch.
        function multicall(bytes[] calldata data) external returns (bytes[] memory results);

        function getBlockHash(uint256 blockNumber) external view returns (bytes32 blockHash);
        function getBlockNumber() external view returns (uint256 blockNumber);
        function getCurrentBlockCoinbase() external view returns (address coinbase);
        function getCurrentBlockTimestamp() external view returns (uint256 timestamp);
        function getEthBalance(address addr) external view returns (uint256 balance);
        function getLastBlockHash() external view returns (bytes32 blockHash);
        function getChainId() external view returns (uint256 chainid);
    }
}
