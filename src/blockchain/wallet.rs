//! Account derivation from private keys and mnemonics.
//!
//! # Security
//! - Keys are never logged or serialized
//! - `Debug` output only shows the address

use alloy::primitives::Address;
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};

use crate::error::{Error, Result};

/// BIP-44 path for Ethereum-compatible accounts; the account index is appended.
pub const DERIVATION_PATH_PREFIX: &str = "m/44'/60'/0'/0/";

/// A locally held key pair.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
}

impl Account {
    /// Checksummed address of the account.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Private key as `0x`-prefixed lowercase hex.
    pub fn private_key(&self) -> String {
        self.signer.to_bytes().to_string()
    }

    /// Signer backing this account.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Accounts namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accounts;

impl Accounts {
    /// Derive an account from a hex-encoded private key (with or without `0x`).
    pub fn from_private_key(&self, private_key_hex: &str) -> Result<Account> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::InvalidPrivateKey(format!("{}", e)))?;

        tracing::debug!(address = %signer.address(), "Account derived from private key");

        Ok(Account { signer })
    }

    /// Derive account `index` from an English BIP-39 mnemonic along
    /// `m/44'/60'/0'/0/{index}`.
    pub fn from_mnemonic(&self, phrase: &str, index: u32) -> Result<Account> {
        let path = format!("{}{}", DERIVATION_PATH_PREFIX, index);

        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .derivation_path(path.as_str())
            .map_err(|e| Error::InvalidMnemonic(format!("{}", e)))?
            .build()
            .map_err(|e| Error::InvalidMnemonic(format!("{}", e)))?;

        tracing::debug!(address = %signer.address(), index, "Account derived from mnemonic");

        Ok(Account { signer })
    }

    /// First account of a mnemonic.
    pub fn from_mnemonic_default(&self, phrase: &str) -> Result<Account> {
        self.from_mnemonic(phrase, 0)
    }
}
