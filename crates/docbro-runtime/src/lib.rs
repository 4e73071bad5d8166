#![doc = include_str!("../README.md")]

mod executor;
pub mod ports_impl;
pub mod process;

pub use executor::{CliInvocation, CommandExecutor};
pub use ports_impl::{CliClient, CliProjectCatalog, CliSearch, CliShelfCatalog};
