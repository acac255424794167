use std::sync::Arc;

use clichat_agent::{ActionCatalog, LlmClient, ReasoningClient, ReasoningOptions};
use clichat_backend::{ActionExecutor, OrderDirectory};
use clichat_core::config::AppConfig;
use clichat_core::ConversationSnapshot;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::coordinator::TranscriptCoordinator;
use crate::events::PresentationSink;

pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct SessionOptions {
    pub queue_capacity: usize,
    pub catalog: ActionCatalog,
    pub reasoning: ReasoningOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            catalog: ActionCatalog::default(),
            reasoning: ReasoningOptions::default(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            queue_capacity: config.session.queue_capacity,
            catalog: ActionCatalog::default(),
            reasoning: ReasoningOptions {
                model: config.llm.model.clone(),
                temperature: config.llm.temperature,
            },
        }
    }
}

/// A running conversation: the coordinator, its route dispatcher and the two
/// consumer workers.
pub struct Session {
    coordinator: Arc<TranscriptCoordinator>,
    dispatcher: JoinHandle<()>,
    reasoning_worker: JoinHandle<()>,
    executor_worker: JoinHandle<()>,
}

impl Session {
    /// Spawns the reasoning and executor workers on the current runtime.
    pub fn start(
        options: SessionOptions,
        llm: Arc<dyn LlmClient>,
        directory: Arc<dyn OrderDirectory>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        let session_id = Uuid::new_v4().to_string();
        let capacity = options.queue_capacity.max(1);
        let (reasoning_tx, reasoning_rx) = mpsc::channel(capacity);
        let (executor_tx, executor_rx) = mpsc::channel(capacity);

        let (coordinator, dispatcher) =
            TranscriptCoordinator::new(session_id.clone(), reasoning_tx, executor_tx, sink);
        let coordinator = Arc::new(coordinator);

        let reasoning = ReasoningClient::new(llm, options.catalog, options.reasoning);
        let executor = ActionExecutor::new(directory);

        let dispatcher = tokio::spawn(dispatcher.run());
        let reasoning_worker =
            tokio::spawn(run_reasoning_worker(reasoning, reasoning_rx, coordinator.clone()));
        let executor_worker =
            tokio::spawn(run_executor_worker(executor, executor_rx, coordinator.clone()));

        info!(
            event_name = "session.started",
            correlation_id = %session_id,
            queue_capacity = capacity,
            "session workers started"
        );

        Self { coordinator, dispatcher, reasoning_worker, executor_worker }
    }

    pub fn coordinator(&self) -> Arc<TranscriptCoordinator> {
        self.coordinator.clone()
    }

    pub fn session_id(&self) -> &str {
        self.coordinator.session_id()
    }

    /// Stops the dispatcher and both workers. Work still queued is discarded.
    pub async fn shutdown(self) {
        let tasks = [
            ("dispatcher", self.dispatcher),
            ("reasoning", self.reasoning_worker),
            ("executor", self.executor_worker),
        ];
        for (_, handle) in &tasks {
            handle.abort();
        }

        for (worker, handle) in tasks {
            if let Err(error) = handle.await {
                if !error.is_cancelled() {
                    warn!(
                        event_name = "session.worker.failed",
                        correlation_id = %self.coordinator.session_id(),
                        worker,
                        error = %error,
                        "worker ended abnormally"
                    );
                }
            }
        }

        info!(
            event_name = "session.stopped",
            correlation_id = %self.coordinator.session_id(),
            "session workers stopped"
        );
    }
}

/// Consumes reasoning snapshots until the queue closes. A failed step is
/// reported and the loop moves on to the next snapshot.
pub async fn run_reasoning_worker(
    mut client: ReasoningClient,
    mut inbox: mpsc::Receiver<ConversationSnapshot>,
    coordinator: Arc<TranscriptCoordinator>,
) {
    while let Some(snapshot) = inbox.recv().await {
        match client.on_snapshot(&snapshot).await {
            Ok(Some(turns)) => {
                if let Err(error) = coordinator.submit_batch(turns).await {
                    coordinator.report_error(error.into());
                }
            }
            Ok(None) => {}
            Err(error) => coordinator.report_error(error.into()),
        }
    }

    info!(
        event_name = "session.worker.drained",
        correlation_id = %coordinator.session_id(),
        worker = "reasoning",
        "inbox closed"
    );
}

pub async fn run_executor_worker(
    executor: ActionExecutor,
    mut inbox: mpsc::Receiver<ConversationSnapshot>,
    coordinator: Arc<TranscriptCoordinator>,
) {
    while let Some(snapshot) = inbox.recv().await {
        match executor.execute(&snapshot).await {
            Ok(turns) => {
                if let Err(error) = coordinator.submit_batch(turns).await {
                    coordinator.report_error(error.into());
                }
            }
            Err(error) => coordinator.report_error(error.into()),
        }
    }

    info!(
        event_name = "session.worker.drained",
        correlation_id = %coordinator.session_id(),
        worker = "executor",
        "inbox closed"
    );
}
