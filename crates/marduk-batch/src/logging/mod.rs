//! Logging setup.
//!
//! The library only emits through the `log` facade; binaries call
//! [`init_logging`] early in `main` to install `env_logger`.

mod init;

pub use init::{LoggingConfig, init_logging};
