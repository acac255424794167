use std::fmt;

use serde::{Deserialize, Serialize};

/// Who produced a turn. The set is closed; routing and rendering match on it
/// exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Customer,
    Agent,
    ReasoningEngine,
    ActionRequest,
    ActionResult,
    Thought,
}

impl Speaker {
    /// Label used when a turn is written into the reasoning transcript.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Agent => "Agent",
            Self::ReasoningEngine => "AI",
            Self::ActionRequest => "Action",
            Self::ActionResult => "Backend",
            Self::Thought => "Thought",
        }
    }

    /// Customer and Agent turns are what the customer sees; the rest is
    /// internal bookkeeping between the reasoning engine and the backend.
    pub fn is_customer_visible(&self) -> bool {
        matches!(self, Self::Customer | Self::Agent)
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
    input: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into(), input: String::new() }
    }

    pub fn customer(text: impl Into<String>) -> Self {
        Self::new(Speaker::Customer, text)
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Speaker::Agent, text)
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        Self::new(Speaker::ReasoningEngine, text)
    }

    pub fn action_request(action: impl Into<String>, input: impl Into<String>) -> Self {
        Self { speaker: Speaker::ActionRequest, text: action.into(), input: input.into() }
    }

    pub fn action_result(text: impl Into<String>) -> Self {
        Self::new(Speaker::ActionResult, text)
    }

    pub fn thought(text: impl Into<String>) -> Self {
        Self::new(Speaker::Thought, text)
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Argument of an action request; empty for every other speaker.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// `Label: text`, the transcript line form.
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.speaker.label(), self.text)
    }
}

/// The triggering turn plus an owned copy of the history up to and including
/// it. Consumers only ever see snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationSnapshot {
    pub current: Turn,
    pub history: Vec<Turn>,
}

impl ConversationSnapshot {
    pub fn new(current: Turn, history: Vec<Turn>) -> Self {
        Self { current, history }
    }

    /// Text of the most recent customer turn, or `""` when the customer has
    /// not spoken yet.
    pub fn last_customer_text(&self) -> &str {
        self.history
            .iter()
            .rev()
            .find(|turn| turn.speaker == Speaker::Customer)
            .map(Turn::text)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationSnapshot, Speaker, Turn};

    #[test]
    fn labels_follow_transcript_vocabulary() {
        assert_eq!(Turn::customer("hi").transcript_line(), "Customer: hi");
        assert_eq!(Turn::action_result("{}").transcript_line(), "Backend: {}");
        assert_eq!(Turn::reasoning("raw").transcript_line(), "AI: raw");
        assert_eq!(
            Turn::action_request("OrderSearch", "123456").transcript_line(),
            "Action: OrderSearch"
        );
    }

    #[test]
    fn only_action_requests_carry_input() {
        let request = Turn::action_request("ReturnOrderFlow", "123456");
        assert_eq!(request.speaker(), Speaker::ActionRequest);
        assert_eq!(request.text(), "ReturnOrderFlow");
        assert_eq!(request.input(), "123456");
        assert_eq!(Turn::agent("hello").input(), "");
    }

    #[test]
    fn last_customer_text_picks_most_recent_customer_turn() {
        let history = vec![
            Turn::customer("first"),
            Turn::agent("reply"),
            Turn::customer("second"),
            Turn::action_result("{}"),
        ];
        let snapshot = ConversationSnapshot::new(Turn::action_result("{}"), history);

        assert_eq!(snapshot.last_customer_text(), "second");
    }

    #[test]
    fn last_customer_text_is_empty_without_customer_turns() {
        let snapshot =
            ConversationSnapshot::new(Turn::agent("hello"), vec![Turn::agent("hello")]);
        assert_eq!(snapshot.last_customer_text(), "");
    }

    #[test]
    fn customer_visibility_split() {
        assert!(Speaker::Customer.is_customer_visible());
        assert!(Speaker::Agent.is_customer_visible());
        assert!(!Speaker::Thought.is_customer_visible());
        assert!(!Speaker::ActionResult.is_customer_visible());
    }
}
