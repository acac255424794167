use clichat_core::{ApplicationError, Turn};
use thiserror::Error;
use tokio::sync::mpsc;

/// What the presentation layer is told about. Batches arrive as one event so
/// a renderer never interleaves them with other turns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentationEvent {
    Turn(Turn),
    Batch(Vec<Turn>),
    Error(ApplicationError),
}

impl PresentationEvent {
    pub fn turns(&self) -> &[Turn] {
        match self {
            Self::Turn(turn) => std::slice::from_ref(turn),
            Self::Batch(turns) => turns,
            Self::Error(_) => &[],
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("presentation channel closed")]
    Closed,
}

pub trait PresentationSink: Send + Sync {
    fn publish(&self, event: PresentationEvent) -> Result<(), SinkError>;
}

/// Sink backed by an unbounded channel; the presentation loop owns the
/// receiving end and never blocks the core.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<PresentationEvent>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl PresentationSink for ChannelSink {
    fn publish(&self, event: PresentationEvent) -> Result<(), SinkError> {
        self.sender.send(event).map_err(|_| SinkError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use clichat_core::{ApplicationError, Turn};

    use super::{ChannelSink, PresentationEvent, PresentationSink, SinkError};

    #[tokio::test]
    async fn channel_sink_delivers_in_order() {
        let (sink, mut receiver) = ChannelSink::channel();

        sink.publish(PresentationEvent::Turn(Turn::customer("hi"))).expect("publish");
        sink.publish(PresentationEvent::Batch(vec![Turn::agent("hello"), Turn::thought("t\n")]))
            .expect("publish");

        assert_eq!(receiver.recv().await, Some(PresentationEvent::Turn(Turn::customer("hi"))));
        let batch = receiver.recv().await.expect("batch");
        assert_eq!(batch.turns().len(), 2);
    }

    #[test]
    fn closed_channel_reports_error() {
        let (sink, receiver) = ChannelSink::channel();
        drop(receiver);

        let result = sink.publish(PresentationEvent::Error(ApplicationError::Completion(
            "boom".to_string(),
        )));
        assert_eq!(result, Err(SinkError::Closed));
    }

    #[test]
    fn error_events_carry_no_turns() {
        let event = PresentationEvent::Error(ApplicationError::Lookup("offline".to_string()));
        assert!(event.turns().is_empty());
    }
}
