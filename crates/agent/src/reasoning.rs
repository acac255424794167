use std::sync::Arc;

use clichat_core::{ApplicationError, ConversationSnapshot, Turn};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::ActionCatalog;
use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::prompt;
use crate::scanner::{self, ParsedIntent};

#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error(transparent)]
    Completion(#[from] LlmError),
}

impl From<ReasoningError> for ApplicationError {
    fn from(error: ReasoningError) -> Self {
        ApplicationError::Completion(error.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReasoningOptions {
    pub model: String,
    pub temperature: f32,
}

impl Default for ReasoningOptions {
    fn default() -> Self {
        Self { model: "gpt-4".to_string(), temperature: 0.3 }
    }
}

/// Turns customer input (and backend observations) into agent replies,
/// action requests, and thoughts.
pub struct ReasoningClient {
    llm: Arc<dyn LlmClient>,
    catalog: ActionCatalog,
    options: ReasoningOptions,
    last_customer_text: String,
}

impl ReasoningClient {
    pub fn new(llm: Arc<dyn LlmClient>, catalog: ActionCatalog, options: ReasoningOptions) -> Self {
        Self { llm, catalog, options, last_customer_text: String::new() }
    }

    /// `Ok(None)` when the snapshot brings no new customer text and the
    /// completion call was skipped; otherwise the derived turns in emission
    /// order (possibly empty).
    pub async fn on_snapshot(
        &mut self,
        snapshot: &ConversationSnapshot,
    ) -> Result<Option<Vec<Turn>>, ReasoningError> {
        let customer_text = snapshot.last_customer_text();
        if customer_text == self.last_customer_text {
            debug!(
                event_name = "agent.reasoning.deduplicated",
                history_len = snapshot.history.len(),
                "no new customer input; skipping completion"
            );
            return Ok(None);
        }
        self.last_customer_text = customer_text.to_string();

        let request = CompletionRequest {
            model: self.options.model.clone(),
            temperature: self.options.temperature,
            prompt: prompt::assemble(&self.catalog, &snapshot.history),
        };
        debug!(event_name = "agent.reasoning.prompt", prompt = %request.prompt, "assembled prompt");

        let completion = self.llm.complete(&request).await?;
        debug!(event_name = "agent.reasoning.completion", completion = %completion, "received completion");

        let intent = scanner::parse(&completion);
        if intent.is_empty() {
            warn!(
                event_name = "agent.reasoning.unstructured",
                history_len = snapshot.history.len(),
                "completion carried no protocol lines"
            );
        }
        let turns = derive_turns(intent);
        info!(
            event_name = "agent.reasoning.completed",
            history_len = snapshot.history.len(),
            derived_turns = turns.len(),
            "reasoning step produced turns"
        );

        Ok(Some(turns))
    }
}

fn derive_turns(intent: ParsedIntent) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(3);

    if let Some(reply) = intent.agent_reply.filter(|reply| !reply.is_empty()) {
        turns.push(Turn::agent(reply));
    }
    if let Some(action) = intent.action_name.filter(|action| !action.is_empty()) {
        turns.push(Turn::action_request(action, intent.action_input.unwrap_or_default()));
    }
    if let Some(thought) = intent.thought.filter(|thought| !thought.is_empty()) {
        turns.push(Turn::thought(thought));
    }

    turns
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use clichat_core::{ConversationSnapshot, Speaker, Turn};
    use tokio::sync::Mutex;

    use super::{ReasoningClient, ReasoningOptions};
    use crate::catalog::ActionCatalog;
    use crate::llm::{CompletionRequest, LlmClient, LlmError};

    #[derive(Default)]
    struct ScriptedLlm {
        state: Mutex<ScriptedState>,
    }

    #[derive(Default)]
    struct ScriptedState {
        responses: VecDeque<Result<String, LlmError>>,
        requests: Vec<CompletionRequest>,
    }

    impl ScriptedLlm {
        fn with_responses(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                state: Mutex::new(ScriptedState {
                    responses: responses.into(),
                    requests: Vec::new(),
                }),
            }
        }

        async fn requests(&self) -> Vec<CompletionRequest> {
            self.state.lock().await.requests.clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            let mut state = self.state.lock().await;
            state.requests.push(request.clone());
            state.responses.pop_front().unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn snapshot(history: Vec<Turn>) -> ConversationSnapshot {
        let current = history.last().cloned().unwrap_or_else(|| Turn::customer(""));
        ConversationSnapshot::new(current, history)
    }

    fn client(llm: Arc<ScriptedLlm>) -> ReasoningClient {
        ReasoningClient::new(llm, ActionCatalog::default(), ReasoningOptions::default())
    }

    #[tokio::test]
    async fn emits_agent_action_thought_in_order() {
        let llm = Arc::new(ScriptedLlm::with_responses(vec![Ok(
            "Thought: look it up\nAgent: One moment please\nAction: OrderSearch\nAction Input: jpozdena@gmail.com"
                .to_string(),
        )]));
        let mut reasoning = client(llm.clone());

        let turns = reasoning
            .on_snapshot(&snapshot(vec![Turn::customer("my email is jpozdena@gmail.com")]))
            .await
            .expect("reasoning succeeds")
            .expect("completion was called");

        let speakers = turns.iter().map(Turn::speaker).collect::<Vec<_>>();
        assert_eq!(speakers, vec![Speaker::Agent, Speaker::ActionRequest, Speaker::Thought]);
        assert_eq!(turns[0].text(), "One moment please");
        assert_eq!(turns[1].text(), "OrderSearch");
        assert_eq!(turns[1].input(), "jpozdena@gmail.com");
        assert_eq!(turns[2].text(), "look it up\n");
    }

    #[tokio::test]
    async fn request_uses_configured_model_and_temperature() {
        let llm = Arc::new(ScriptedLlm::with_responses(vec![Ok("Agent: hi".to_string())]));
        let mut reasoning = ReasoningClient::new(
            llm.clone(),
            ActionCatalog::default(),
            ReasoningOptions { model: "gpt-3.5-turbo".to_string(), temperature: 0.1 },
        );

        reasoning.on_snapshot(&snapshot(vec![Turn::customer("hello")])).await.expect("ok");

        let requests = llm.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-3.5-turbo");
        assert!((requests[0].temperature - 0.1).abs() < f32::EPSILON);
        assert!(requests[0].prompt.ends_with("Begin!\n\nCustomer: hello\n"));
    }

    #[tokio::test]
    async fn repeated_customer_text_calls_completion_once() {
        let llm = Arc::new(ScriptedLlm::with_responses(vec![Ok(
            "Action: OrderSearch\nAction Input: 654321".to_string(),
        )]));
        let mut reasoning = client(llm.clone());

        let first = vec![Turn::customer("order 654321 please")];
        let mut second = first.clone();
        second.push(Turn::action_request("OrderSearch", "654321"));
        second.push(Turn::action_result("{\"orders\": []}"));

        let first_outcome = reasoning.on_snapshot(&snapshot(first)).await.expect("ok");
        let second_outcome = reasoning.on_snapshot(&snapshot(second)).await.expect("ok");

        assert!(first_outcome.is_some());
        assert_eq!(second_outcome, None);
        assert_eq!(llm.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn history_without_customer_text_is_skipped() {
        let llm = Arc::new(ScriptedLlm::default());
        let mut reasoning = client(llm.clone());

        let outcome =
            reasoning.on_snapshot(&snapshot(vec![Turn::action_result("{}")])).await.expect("ok");

        assert_eq!(outcome, None);
        assert!(llm.requests().await.is_empty());
    }

    #[tokio::test]
    async fn completion_failure_emits_nothing_and_still_advances_guard() {
        let llm = Arc::new(ScriptedLlm::with_responses(vec![Err(LlmError::Api {
            status: 500,
            message: "upstream down".to_string(),
        })]));
        let mut reasoning = client(llm.clone());
        let history = vec![Turn::customer("hello?")];

        let error = reasoning.on_snapshot(&snapshot(history.clone())).await.err();
        assert!(error.is_some_and(|error| error.to_string().contains("upstream down")));

        let retry = reasoning.on_snapshot(&snapshot(history)).await.expect("ok");
        assert_eq!(retry, None);
        assert_eq!(llm.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn unstructured_completion_yields_empty_batch() {
        let llm = Arc::new(ScriptedLlm::with_responses(vec![Ok(
            "I am not following the format".to_string(),
        )]));
        let mut reasoning = client(llm);

        let turns = reasoning
            .on_snapshot(&snapshot(vec![Turn::customer("hi")]))
            .await
            .expect("ok")
            .expect("completion was called");

        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn new_customer_text_triggers_another_call() {
        let llm = Arc::new(ScriptedLlm::with_responses(vec![
            Ok("Agent: What is your order number?".to_string()),
            Ok("Action: ReturnOrderFlow\nAction Input: 123456".to_string()),
        ]));
        let mut reasoning = client(llm.clone());

        let mut history = vec![Turn::customer("I want to return something")];
        reasoning.on_snapshot(&snapshot(history.clone())).await.expect("ok");
        history.push(Turn::agent("What is your order number?"));
        history.push(Turn::customer("123456"));
        let turns = reasoning
            .on_snapshot(&snapshot(history))
            .await
            .expect("ok")
            .expect("completion was called");

        assert_eq!(llm.requests().await.len(), 2);
        assert_eq!(turns, vec![Turn::action_request("ReturnOrderFlow", "123456")]);
    }
}
