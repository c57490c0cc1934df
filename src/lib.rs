//! Client library for the 8pay subscription contracts.
//!
//! ```text
//!   EightPay
//!     ├── fixed_recurring / variable_recurring / on_demand   (billing)
//!     │        bill, terminate → Transaction
//!     │                              ├── estimate_gas
//!     │                              └── send → LifecycleHandle
//!     ├── accounts()   from_private_key, from_mnemonic
//!     └── units()      parse_amount, format_amount
//! ```
//!
//! Transactions are submitted either through an account unlocked on the node
//! or signed locally from a private key; both paths report progress through
//! the same [`LifecycleHandle`].

pub mod billing;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod observability;
pub mod registry;
pub mod units;

use std::sync::Arc;

pub use billing::{FixedRecurring, OnDemand, VariableRecurring};
pub use blockchain::{
    Account, Accounts, BlockchainClient, Ledger, LifecycleEvent, LifecycleEventKind,
    LifecycleHandle, SubmissionOptions, Transaction,
};
pub use config::EightPayConfig;
pub use error::{Error, ErrorKind, Result};
pub use registry::{ContractName, DeploymentRegistry, Network};
pub use units::{Token, Units};

/// Entry point: one namespace per billing mode plus accounts and units.
#[derive(Debug)]
pub struct EightPay<L> {
    network: Network,
    pub fixed_recurring: FixedRecurring<L>,
    pub variable_recurring: VariableRecurring<L>,
    pub on_demand: OnDemand<L>,
    units: Units,
}

impl<L: Ledger> EightPay<L> {
    /// Build the client for `network`. Fails if any of the three contracts
    /// has no address in `registry` for that network.
    pub fn new(ledger: Arc<L>, network: Network, registry: &DeploymentRegistry, units: Units) -> Result<Self> {
        let client = Self {
            network,
            fixed_recurring: FixedRecurring::new(ledger.clone(), registry, network)?,
            variable_recurring: VariableRecurring::new(ledger.clone(), registry, network)?,
            on_demand: OnDemand::new(ledger, registry, network)?,
            units,
        };

        tracing::info!(
            network = %network,
            fixed_recurring = %client.fixed_recurring.address(),
            variable_recurring = %client.variable_recurring.address(),
            on_demand = %client.on_demand.address(),
            "8pay client ready"
        );

        Ok(client)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Account derivation helpers.
    pub fn accounts(&self) -> Accounts {
        Accounts
    }

    /// Amount conversion for this network's tokens.
    pub fn units(&self) -> &Units {
        &self.units
    }
}

impl EightPay<BlockchainClient> {
    /// Connect to the configured node and build the client from the
    /// configured deployments and tokens.
    pub async fn connect(config: &EightPayConfig) -> Result<Self> {
        let ledger = BlockchainClient::new(config.blockchain.clone()).await?;
        let registry = DeploymentRegistry::from_config(&config.deployments);
        let units = Units::from_config(config.network, &config.tokens);

        Self::new(Arc::new(ledger), config.network, &registry, units)
    }
}
