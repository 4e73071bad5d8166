#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{DocbroContext, ServerConfig, bootstrap, default_admin_config, start_server};
pub use error::HttpError;
pub use routes::{REST_PREFIX, admin_router, read_only_router};
pub use state::{AdminState, ReadOnlyState};
