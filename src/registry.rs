//! Deployment registry: where each subscriptions-management contract lives.
//!
//! The registry is plain read-only data handed to constructors; nothing is
//! looked up from process-wide state.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Networks the 8pay contracts are deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// BNB Smart Chain mainnet.
    Bsc,
    /// BNB Smart Chain testnet.
    BscTestnet,
    /// Local development chain.
    #[default]
    Private,
}

impl Network {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bsc => "bsc",
            Self::BscTestnet => "bsc-testnet",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bsc" => Ok(Self::Bsc),
            "bsc-testnet" | "bsc_testnet" => Ok(Self::BscTestnet),
            "private" => Ok(Self::Private),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}

/// Contracts the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContractName {
    FixedRecurringSubscriptionsManagement,
    VariableRecurringSubscriptionsManagement,
    OnDemandSubscriptionsManagement,
}

impl ContractName {
    pub const ALL: [Self; 3] = [
        Self::FixedRecurringSubscriptionsManagement,
        Self::VariableRecurringSubscriptionsManagement,
        Self::OnDemandSubscriptionsManagement,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FixedRecurringSubscriptionsManagement => "FixedRecurringSubscriptionsManagement",
            Self::VariableRecurringSubscriptionsManagement => "VariableRecurringSubscriptionsManagement",
            Self::OnDemandSubscriptionsManagement => "OnDemandSubscriptionsManagement",
        }
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown contract '{}'", s))
    }
}

/// Contract addresses per network.
#[derive(Debug, Clone, Default)]
pub struct DeploymentRegistry {
    addresses: HashMap<(Network, ContractName), Address>,
}

impl DeploymentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deployment.
    pub fn with_deployment(mut self, network: Network, contract: ContractName, address: Address) -> Self {
        self.addresses.insert((network, contract), address);
        self
    }

    /// Build from the `[deployments]` configuration tables. Unknown contract
    /// names and malformed addresses are skipped with a warning; validation
    /// reports them before this point.
    pub fn from_config(deployments: &BTreeMap<Network, BTreeMap<String, String>>) -> Self {
        let mut registry = Self::new();
        for (network, contracts) in deployments {
            for (name, address) in contracts {
                match (name.parse::<ContractName>(), address.parse::<Address>()) {
                    (Ok(contract), Ok(address)) => {
                        registry.addresses.insert((*network, contract), address);
                    }
                    _ => {
                        tracing::warn!(network = %network, contract = %name, "Ignoring invalid deployment entry");
                    }
                }
            }
        }
        registry
    }

    /// Address of `contract` on `network`.
    pub fn load(&self, network: Network, contract: ContractName) -> Result<Address> {
        self.addresses
            .get(&(network, contract))
            .copied()
            .ok_or_else(|| Error::ContractNotDeployed {
                contract: contract.to_string(),
                network: network.to_string(),
            })
    }
}
