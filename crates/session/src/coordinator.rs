use std::fmt;
use std::sync::Arc;

use clichat_core::{ApplicationError, ConversationSnapshot, Speaker, Turn};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::events::{PresentationEvent, PresentationSink};

/// Where a freshly appended turn is delivered besides presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Reasoning,
    Executor,
    PresentationOnly,
}

impl Route {
    pub fn for_speaker(speaker: Speaker) -> Self {
        match speaker {
            Speaker::Customer | Speaker::ActionResult => Self::Reasoning,
            Speaker::ActionRequest => Self::Executor,
            Speaker::Agent | Speaker::ReasoningEngine | Speaker::Thought => Self::PresentationOnly,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reasoning => "reasoning",
            Self::Executor => "executor",
            Self::PresentationOnly => "presentation",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("{0} queue is closed")]
    QueueClosed(Route),
}

impl From<CoordinatorError> for ApplicationError {
    fn from(error: CoordinatorError) -> Self {
        ApplicationError::Routing(error.to_string())
    }
}

#[derive(Clone, Debug)]
struct RouteQueues {
    reasoning: mpsc::Sender<ConversationSnapshot>,
    executor: mpsc::Sender<ConversationSnapshot>,
}

impl RouteQueues {
    fn queue(&self, route: Route) -> Option<&mpsc::Sender<ConversationSnapshot>> {
        match route {
            Route::Reasoning => Some(&self.reasoning),
            Route::Executor => Some(&self.executor),
            Route::PresentationOnly => None,
        }
    }
}

/// Single owner of the conversation history.
///
/// Appending, publishing to presentation and handing snapshots to the
/// `RouteDispatcher` all happen under one lock, so observers see turns in
/// history order and a batch is never interleaved with another submission.
/// The lock is never held across a wait on a bounded queue.
pub struct TranscriptCoordinator {
    session_id: String,
    history: Mutex<Vec<Turn>>,
    queues: RouteQueues,
    dispatch_tx: mpsc::UnboundedSender<ConversationSnapshot>,
    sink: Arc<dyn PresentationSink>,
}

impl TranscriptCoordinator {
    /// The returned dispatcher must be driven (`RouteDispatcher::run`) for
    /// snapshots to reach the worker queues.
    pub fn new(
        session_id: impl Into<String>,
        reasoning_tx: mpsc::Sender<ConversationSnapshot>,
        executor_tx: mpsc::Sender<ConversationSnapshot>,
        sink: Arc<dyn PresentationSink>,
    ) -> (Self, RouteDispatcher) {
        let session_id = session_id.into();
        let queues = RouteQueues { reasoning: reasoning_tx, executor: executor_tx };
        let (dispatch_tx, dispatch_rx) = mpsc::unbounded_channel();

        let dispatcher = RouteDispatcher {
            session_id: session_id.clone(),
            inbox: dispatch_rx,
            queues: queues.clone(),
            sink: sink.clone(),
        };
        let coordinator =
            Self { session_id, history: Mutex::new(Vec::new()), queues, dispatch_tx, sink };

        (coordinator, dispatcher)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn submit(&self, turn: Turn) -> Result<(), CoordinatorError> {
        self.append(vec![turn], false).await
    }

    /// Appends the turns contiguously. Each one is routed with a snapshot of
    /// the history up to and including itself. An empty batch is a no-op.
    pub async fn submit_batch(&self, turns: Vec<Turn>) -> Result<(), CoordinatorError> {
        if turns.is_empty() {
            return Ok(());
        }
        self.append(turns, true).await
    }

    pub fn report_error(&self, error: ApplicationError) {
        warn!(
            event_name = "session.error.reported",
            correlation_id = %self.session_id,
            error_class = error.error_class(),
            error = %error,
            "processing step failed"
        );
        publish_or_report(self.sink.as_ref(), &self.session_id, PresentationEvent::Error(error));
    }

    pub async fn history(&self) -> Vec<Turn> {
        self.history.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.history.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.history.lock().await.is_empty()
    }

    async fn append(&self, turns: Vec<Turn>, as_batch: bool) -> Result<(), CoordinatorError> {
        let mut history = self.history.lock().await;

        let mut snapshots = Vec::with_capacity(turns.len());
        for turn in &turns {
            history.push(turn.clone());
            snapshots.push(ConversationSnapshot::new(turn.clone(), history.clone()));
            debug!(
                event_name = "session.turn.appended",
                correlation_id = %self.session_id,
                speaker = %turn.speaker(),
                history_len = history.len(),
                "turn appended"
            );
        }

        let mut turns = turns;
        let event = if !as_batch && turns.len() == 1 {
            PresentationEvent::Turn(turns.remove(0))
        } else {
            PresentationEvent::Batch(turns)
        };
        publish_or_report(self.sink.as_ref(), &self.session_id, event);

        let mut first_failure = None;
        for snapshot in snapshots {
            let route = Route::for_speaker(snapshot.current.speaker());
            let Some(queue) = self.queues.queue(route) else {
                continue;
            };
            if queue.is_closed() || self.dispatch_tx.send(snapshot).is_err() {
                warn!(
                    event_name = "session.route.queue_closed",
                    correlation_id = %self.session_id,
                    route = %route,
                    "dropping snapshot for closed queue"
                );
                first_failure.get_or_insert(CoordinatorError::QueueClosed(route));
            }
        }

        drop(history);
        first_failure.map_or(Ok(()), Err)
    }
}

/// Forwards routed snapshots, in history order, into the bounded worker
/// queues. This is the only producer that waits on a full queue.
pub struct RouteDispatcher {
    session_id: String,
    inbox: mpsc::UnboundedReceiver<ConversationSnapshot>,
    queues: RouteQueues,
    sink: Arc<dyn PresentationSink>,
}

impl RouteDispatcher {
    pub async fn run(mut self) {
        while let Some(snapshot) = self.inbox.recv().await {
            let route = Route::for_speaker(snapshot.current.speaker());
            let Some(queue) = self.queues.queue(route) else {
                continue;
            };
            if queue.send(snapshot).await.is_err() {
                let error = ApplicationError::from(CoordinatorError::QueueClosed(route));
                warn!(
                    event_name = "session.route.queue_closed",
                    correlation_id = %self.session_id,
                    route = %route,
                    "worker queue closed while dispatching"
                );
                publish_or_report(self.sink.as_ref(), &self.session_id, PresentationEvent::Error(error));
            }
        }

        info!(
            event_name = "session.dispatcher.drained",
            correlation_id = %self.session_id,
            "dispatch inbox closed"
        );
    }
}

fn publish_or_report(sink: &dyn PresentationSink, session_id: &str, event: PresentationEvent) {
    if let Err(error) = sink.publish(event) {
        warn!(
            event_name = "session.presentation.failed",
            correlation_id = %session_id,
            error = %error,
            "presentation sink rejected event"
        );
        let notice = PresentationEvent::Error(ApplicationError::Presentation(error.to_string()));
        if let Err(retry_error) = sink.publish(notice) {
            debug!(
                event_name = "session.presentation.notice_dropped",
                correlation_id = %session_id,
                error = %retry_error,
                "could not report presentation failure"
            );
        }
    }
}
