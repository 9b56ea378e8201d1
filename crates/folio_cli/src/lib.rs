//! Folio command-line interface
//!
//! The `folio` binary is a thin shell over this library so the commands can
//! be exercised from tests without spawning a process.

pub mod cli;
pub mod commands;
pub mod scaffold;

pub use cli::{Cli, Command};
pub use commands::{execute, Outcome};
