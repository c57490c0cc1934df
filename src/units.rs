//! Token metadata and amount conversion between decimal and base units.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{Address, U256};

use crate::config::TokenConfig;
use crate::error::{Error, Result};
use crate::registry::Network;

/// Native coin of every supported network.
pub const NATIVE_SYMBOL: &str = "BNB";
pub const NATIVE_DECIMALS: u8 = 18;

/// A token amounts can be expressed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub symbol: String,
    pub decimals: u8,
    /// `None` for the native coin.
    pub address: Option<Address>,
}

impl Token {
    pub fn native() -> Self {
        Self {
            symbol: NATIVE_SYMBOL.to_string(),
            decimals: NATIVE_DECIMALS,
            address: None,
        }
    }
}

/// Units namespace for one network.
#[derive(Debug, Clone)]
pub struct Units {
    network: Network,
    tokens: Vec<Token>,
}

impl Units {
    /// Units for `network` knowing the native coin plus `tokens`.
    pub fn new(network: Network, tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut all = vec![Token::native()];
        all.extend(tokens);
        Self {
            network,
            tokens: all,
        }
    }

    /// Units from the `[[tokens]]` configuration entries of `network`.
    pub fn from_config(network: Network, tokens: &[TokenConfig]) -> Self {
        let tokens = tokens
            .iter()
            .filter(|t| t.network == network)
            .map(|t| Token {
                symbol: t.symbol.clone(),
                decimals: t.decimals,
                address: t.address.as_deref().and_then(|a| a.parse().ok()),
            })
            .collect::<Vec<_>>();
        Self::new(network, tokens)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Find a token by symbol or contract address, ignoring case.
    pub fn token(&self, token_or_symbol: &str) -> Result<&Token> {
        let by_address = token_or_symbol.parse::<Address>().ok();
        self.tokens
            .iter()
            .find(|t| match by_address {
                Some(address) => t.address == Some(address),
                None => t.symbol.eq_ignore_ascii_case(token_or_symbol),
            })
            .ok_or_else(|| Error::UnknownToken(token_or_symbol.to_string()))
    }

    /// Decimal amount to base units.
    pub fn to_base_units(&self, amount: &str, token_or_symbol: &str) -> Result<U256> {
        let token = self.token(token_or_symbol)?;
        let amount = amount.trim();
        if amount.starts_with('-') || fraction_digits(amount) > usize::from(token.decimals) {
            return Err(Error::InvalidAmount(amount.to_string()));
        }
        let parsed = parse_units(amount, token.decimals)
            .map_err(|_| Error::InvalidAmount(amount.to_string()))?;
        Ok(parsed.get_absolute())
    }

    /// Decimal amount to a base-unit integer string: `"1"` BNB →
    /// `"1000000000000000000"`.
    pub fn parse_amount(&self, amount: &str, token_or_symbol: &str) -> Result<String> {
        self.to_base_units(amount, token_or_symbol)
            .map(|value| value.to_string())
    }

    /// Base-unit integer string to the shortest decimal string.
    pub fn format_amount(&self, amount: &str, token_or_symbol: &str) -> Result<String> {
        let token = self.token(token_or_symbol)?;
        let value = U256::from_str_radix(amount.trim(), 10)
            .map_err(|_| Error::InvalidAmount(amount.to_string()))?;
        let formatted = format_units(value, token.decimals)
            .map_err(|_| Error::InvalidAmount(amount.to_string()))?;
        Ok(trim_decimal(&formatted))
    }
}

/// Significant digits after the decimal point; trailing zeros do not count.
fn fraction_digits(amount: &str) -> usize {
    amount
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.trim_end_matches('0').len())
}

fn trim_decimal(value: &str) -> String {
    if value.contains('.') {
        value.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        value.to_string()
    }
}
