//! Call encoders for the subscriptions-management contracts.
//!
//! # Data Flow
//! ```text
//! bill / terminate (JSON-like inputs)
//!     → validator.rs (plan id, ids, amounts; first failure wins)
//!     → contracts.rs (ABI encoding)
//!     → Transaction bound to the registry address
//! ```
//!
//! Validation happens before any ledger interaction; a rejected call creates
//! no state.

pub mod contracts;
pub mod fixed_recurring;
pub mod on_demand;
pub mod validator;
pub mod variable_recurring;

pub use fixed_recurring::FixedRecurring;
pub use on_demand::OnDemand;
pub use variable_recurring::VariableRecurring;
