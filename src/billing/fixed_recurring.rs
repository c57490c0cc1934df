//! Fixed-recurring subscriptions: the plan defines the amount charged.

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use serde_json::Value;

use crate::billing::contracts::FixedRecurringSubscriptionsManagement as Contract;
use crate::billing::validator::validate_subscriptions;
use crate::blockchain::{Ledger, Transaction};
use crate::error::Result;
use crate::registry::{ContractName, DeploymentRegistry, Network};

/// Call encoder for `FixedRecurringSubscriptionsManagement`.
#[derive(Debug)]
pub struct FixedRecurring<L> {
    ledger: Arc<L>,
    address: Address,
}

impl<L: Ledger> FixedRecurring<L> {
    pub fn new(ledger: Arc<L>, registry: &DeploymentRegistry, network: Network) -> Result<Self> {
        let address = registry.load(network, ContractName::FixedRecurringSubscriptionsManagement)?;
        Ok(Self { ledger, address })
    }

    /// Contract address on the configured network.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Charge the plan's fixed amount to each subscription.
    pub fn bill(&self, plan_id: impl Into<Value>, subscription_ids: impl Into<Value>) -> Result<Transaction<L>> {
        let args = validate_subscriptions(&plan_id.into(), &subscription_ids.into())?;

        let data = Contract::billCall {
            planId: args.plan_id,
            subscriptionIds: args.subscription_ids,
        }
        .abi_encode();

        Ok(Transaction::new(self.ledger.clone(), self.address, data.into()))
    }

    /// Terminate each subscription.
    pub fn terminate(&self, plan_id: impl Into<Value>, subscription_ids: impl Into<Value>) -> Result<Transaction<L>> {
        let args = validate_subscriptions(&plan_id.into(), &subscription_ids.into())?;

        let data = Contract::terminateCall {
            planId: args.plan_id,
            subscriptionIds: args.subscription_ids,
        }
        .abi_encode();

        Ok(Transaction::new(self.ledger.clone(), self.address, data.into()))
    }
}
