//! Role-specific capability services.

mod admin;
pub mod args;
mod read_only;

pub use admin::AdminService;
pub use read_only::{MAX_SEARCH_LIMIT, ReadOnlyService};
