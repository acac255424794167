//! Conversation orchestration.
//!
//! A `TranscriptCoordinator` owns the append-only history and routes every
//! new turn: customer input and backend observations go to the reasoning
//! worker, action requests go to the executor worker, and everything is
//! published to the presentation sink. A `RouteDispatcher` task moves the
//! routed snapshots into the bounded worker queues, so submitting never waits
//! on a full queue. `Session` wires the workers up.

pub mod coordinator;
pub mod events;
pub mod runtime;

pub use coordinator::{CoordinatorError, Route, RouteDispatcher, TranscriptCoordinator};
pub use events::{ChannelSink, PresentationEvent, PresentationSink, SinkError};
pub use runtime::{Session, SessionOptions, DEFAULT_QUEUE_CAPACITY};
