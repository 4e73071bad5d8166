#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod parser;
pub mod serve;

pub use commands::{Commands, ServeArgs, ServeMode};
pub use parser::Cli;
