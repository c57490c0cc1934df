use std::sync::Arc;

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use serde_json::Value;

use crate::billing::contracts::OnDemandSubscriptionsManagement as Contract;
use crate::billing::validator::{validate_billing, validate_subscriptions};
use crate::blockchain::{Ledger, Transaction};
use crate::error::Result;
use crate::registry::{ContractName, DeploymentRegistry, Network};

/// Call encoder for `OnDemandSubscriptionsManagement`.
#[derive(Debug)]
pub struct OnDemand<L> {
    ledger: Arc<L>,
    address: Address,
}

impl<L: Ledger> OnDemand<L> {
    pub fn new(ledger: Arc<L>, registry: &DeploymentRegistry, network: Network) -> Result<Self> {
        let address = registry.load(network, ContractName::OnDemandSubscriptionsManagement)?;
        Ok(Self { ledger, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Charge `amounts[i]` (base units) to `subscription_ids[i]`, within each
    /// subscription's allowance.
    pub fn bill(
        &self,
        plan_id: impl Into<Value>,
        subscription_ids: impl Into<Value>,
        amounts: impl Into<Value>,
    ) -> Result<Transaction<L>> {
        let args = validate_billing(&plan_id.into(), &subscription_ids.into(), &amounts.into())?;

        let data = Contract::billCall {
            planId: args.plan_id,
            subscriptionIds: args.subscription_ids,
            amounts: args.amounts,
        }
        .abi_encode();

        Ok(Transaction::new(self.ledger.clone(), self.address, data.into()))
    }

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
