//! Deterministic backend for the chat simulator.
//!
//! - `directory` - the order data capability and the demo fixture
//! - `executor` - action dispatch over a closed set of supported actions

pub mod directory;
pub mod executor;

pub use directory::{FixtureOrderDirectory, LookupError, OrderDirectory};
pub use executor::{ActionExecutor, BackendAction, ExecutorError};
