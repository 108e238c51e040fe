//! Logging setup.
//!
//! The engine itself only talks to the `log` facade; `env_logger` is installed
//! here for binaries that want it.

mod init;

pub use init::{LoggingConfig, init_logging};
