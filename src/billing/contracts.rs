//! ABI of the subscriptions-management contracts.

use alloy::sol;

sol! {
    /// Subscriptions billed a fixed amount every period.
    interface FixedRecurringSubscriptionsManagement {
        function bill(bytes32 planId, bytes32[] subscriptionIds) external;
        function terminate(bytes32 planId, bytes32[] subscriptionIds) external;
    }

    /// Subscriptions billed a receiver-chosen amount every period.
    interface VariableRecurringSubscriptionsManagement {
        function bill(bytes32 planId, bytes32[] subscriptionIds, uint256[] amounts) external;
        function terminate(bytes32 planId, bytes32[] subscriptionIds) external;
    }

    /// Subscriptions billed on demand up to an allowance.
    interface OnDemandSubscriptionsManagement {
        function bill(bytes32 planId, bytes32[] subscriptionIds, uint256[] amounts) external;
        function terminate(bytes32 planId, bytes32[] subscriptionIds) external;
    }
}
