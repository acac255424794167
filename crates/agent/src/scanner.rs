//! Line scanner for ReAct-style completions.
//!
//! Every line is `Label: data`. `Agent` and `Thought` lines may appear
//! anywhere. An `Action` is only accepted when its `Action Input` sits on the
//! very next line; anything in between drops the action and scanning goes on.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedIntent {
    pub agent_reply: Option<String>,
    pub action_name: Option<String>,
    pub action_input: Option<String>,
    pub thought: Option<String>,
}

impl ParsedIntent {
    pub fn is_empty(&self) -> bool {
        self.agent_reply.is_none()
            && self.action_name.is_none()
            && self.action_input.is_none()
            && self.thought.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Label {
    Agent,
    Thought,
    Action,
    ActionInput,
    Other,
}

impl Label {
    fn parse(raw: &str) -> Self {
        match raw {
            "Agent" => Self::Agent,
            "Thought" => Self::Thought,
            "Action" => Self::Action,
            "Action Input" => Self::ActionInput,
            _ => Self::Other,
        }
    }
}

fn split_line(line: &str) -> (Label, &str) {
    match line.split_once(':') {
        Some((label, data)) => (Label::parse(label), data.trim_start()),
        None => (Label::Other, ""),
    }
}

pub fn parse(raw: &str) -> ParsedIntent {
    let mut intent = ParsedIntent::default();
    let mut action_idx: Option<usize> = None;

    for (idx, line) in raw.lines().enumerate() {
        let (label, data) = split_line(line);

        match label {
            Label::Agent => intent.agent_reply = Some(data.to_string()),
            Label::Thought => {
                let thought = intent.thought.get_or_insert_with(String::new);
                thought.push_str(data);
                thought.push('\n');
            }
            Label::Action => {
                intent.action_name = Some(data.to_string());
                action_idx = Some(idx);
            }
            Label::ActionInput => {
                if action_idx.map(|action_line| action_line + 1) == Some(idx) {
                    intent.action_input = Some(data.to_string());
                    return intent;
                }
                intent.action_name = None;
                action_idx = None;
            }
            Label::Other => {}
        }
    }

    intent
}

#[cfg(test)]
mod tests {
    use super::{parse, ParsedIntent};

    #[test]
    fn adjacent_action_pair_is_accepted() {
        let intent = parse(
            "Thought: I should look the order up\nAction: OrderSearch\nAction Input: 654321",
        );

        assert_eq!(intent.action_name.as_deref(), Some("OrderSearch"));
        assert_eq!(intent.action_input.as_deref(), Some("654321"));
        assert_eq!(intent.thought.as_deref(), Some("I should look the order up\n"));
    }

    #[test]
    fn intervening_line_drops_the_action() {
        let intent = parse("Action: OrderSearch\nsome commentary\nAction Input: 654321");

        assert_eq!(intent.action_name, None);
        assert_eq!(intent.action_input, None);
    }

    #[test]
    fn scanning_stops_at_first_valid_action_input() {
        let intent = parse(
            "Action: ReturnOrderFlow\nAction Input: 123456\nAgent: too late\nThought: ignored",
        );

        assert_eq!(intent.action_name.as_deref(), Some("ReturnOrderFlow"));
        assert_eq!(intent.action_input.as_deref(), Some("123456"));
        assert_eq!(intent.agent_reply, None);
        assert_eq!(intent.thought, None);
    }

    #[test]
    fn dropped_action_can_be_followed_by_a_valid_one() {
        let intent = parse(
            "Action: OrderSearch\n\nAction Input: nope\nAction: EscalateToHuman\nAction Input: confused",
        );

        assert_eq!(intent.action_name.as_deref(), Some("EscalateToHuman"));
        assert_eq!(intent.action_input.as_deref(), Some("confused"));
    }

    #[test]
    fn action_input_without_action_is_ignored() {
        let intent = parse("Action Input: 123456\nAgent: hello");

        assert_eq!(intent.action_name, None);
        assert_eq!(intent.action_input, None);
        assert_eq!(intent.agent_reply.as_deref(), Some("hello"));
    }

    #[test]
    fn trailing_action_keeps_name_without_input() {
        let intent = parse("Thought: closing\nAction: CloseConversation");

        assert_eq!(intent.action_name.as_deref(), Some("CloseConversation"));
        assert_eq!(intent.action_input, None);
    }

    #[test]
    fn thoughts_accumulate_and_agent_last_wins() {
        let intent = parse("Thought: one\nAgent: first\nThought: two\nAgent: second");

        assert_eq!(intent.thought.as_deref(), Some("one\ntwo\n"));
        assert_eq!(intent.agent_reply.as_deref(), Some("second"));
    }

    #[test]
    fn data_keeps_later_colons_and_trims_leading_space() {
        let intent = parse("Agent:    Your order ships at 10:30: tomorrow");

        assert_eq!(intent.agent_reply.as_deref(), Some("Your order ships at 10:30: tomorrow"));
    }

    #[test]
    fn lines_without_colon_or_unknown_labels_change_nothing() {
        let intent = parse("just text\nObservation: something\n  Agent: indented label");

        assert_eq!(intent, ParsedIntent::default());
        assert!(intent.is_empty());
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let intent = parse("Action: OrderSearch\r\nAction Input: 5033480170\r\n");

        assert_eq!(intent.action_name.as_deref(), Some("OrderSearch"));
        assert_eq!(intent.action_input.as_deref(), Some("5033480170"));
    }

    #[test]
    fn empty_completion_yields_empty_intent() {
        assert!(parse("").is_empty());
    }
}
