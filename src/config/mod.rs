//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EightPayConfig (validated, immutable)
//!     → EightPay::connect builds ledger, registry and units from it
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BlockchainConfig, EightPayConfig, ObservabilityConfig, TokenConfig};
