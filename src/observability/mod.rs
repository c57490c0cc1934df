//! Observability subsystem.
//!
//! Every subsystem logs through `tracing` with structured fields (addresses,
//! hashes, gas figures; never keys). `logging.rs` installs the subscriber.

pub mod logging;

pub use logging::init_logging;
