//! Child process plumbing shared by the executor.

mod capture;
mod shutdown;

pub use capture::{OutputCapture, capture_output};
pub use shutdown::{DEFAULT_TERM_GRACE, terminate_child};
