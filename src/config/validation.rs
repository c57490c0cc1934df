//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected and returned together.

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::EightPayConfig;
use crate::registry::ContractName;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("blockchain.rpc_url '{0}' is not a valid URL")]
    InvalidRpcUrl(String),

    #[error("blockchain.rpc_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("blockchain.receipt_poll_interval_ms must be greater than zero")]
    ZeroPollInterval,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("deployments.{network}: unknown contract '{contract}'")]
    UnknownContract { network: String, contract: String },

    #[error("deployments.{network}.{contract}: '{address}' is not an address")]
    InvalidContractAddress {
        network: String,
        contract: String,
        address: String,
    },

    #[error("tokens: '{symbol}' has invalid address '{address}'")]
    InvalidTokenAddress { symbol: String, address: String },

    #[error("tokens: '{0}' has an empty symbol")]
    EmptyTokenSymbol(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a parsed configuration.
pub fn validate_config(config: &EightPayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.blockchain.rpc_url).is_err() {
        errors.push(ValidationError::InvalidRpcUrl(config.blockchain.rpc_url.clone()));
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.blockchain.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.observability.log_level.clone()));
    }

    for (network, contracts) in &config.deployments {
        for (contract, address) in contracts {
            if contract.parse::<ContractName>().is_err() {
                errors.push(ValidationError::UnknownContract {
                    network: network.to_string(),
                    contract: contract.clone(),
                });
            }
            if address.parse::<Address>().is_err() {
                errors.push(ValidationError::InvalidContractAddress {
                    network: network.to_string(),
                    contract: contract.clone(),
                    address: address.clone(),
                });
            }
        }
    }

    for token in &config.tokens {
        if token.symbol.trim().is_empty() {
            errors.push(ValidationError::EmptyTokenSymbol(token.network.to_string()));
        }
        if let Some(address) = &token.address {
            if address.parse::<Address>().is_err() {
                errors.push(ValidationError::InvalidTokenAddress {
                    symbol: token.symbol.clone(),
                    address: address.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
