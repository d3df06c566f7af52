//! Shell command execution.

pub mod command;

pub use command::{CommandRunner, COMMAND_TIMEOUT};
