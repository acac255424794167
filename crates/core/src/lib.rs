//! Shared vocabulary for the chat simulator: turns, snapshots, order records,
//! configuration, and the error taxonomy every other crate reports through.

pub mod config;
pub mod domain;
pub mod errors;

pub use domain::order::{CustomerProfile, LookupResult, OrderItem, OrderRecord};
pub use domain::turn::{ConversationSnapshot, Speaker, Turn};
pub use errors::{ApplicationError, DomainError};
