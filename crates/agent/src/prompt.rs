use clichat_core::Turn;

use crate::catalog::ActionCatalog;

/// Builds the ReAct prompt for one reasoning call. Pure: the same catalog and
/// history always produce the same bytes.
pub fn assemble(catalog: &ActionCatalog, history: &[Turn]) -> String {
    let tools = catalog
        .iter()
        .map(|(name, description)| format!("{name}: {description}"))
        .collect::<Vec<_>>()
        .join("\n");
    let tool_names = catalog.names().collect::<Vec<_>>().join(", ");
    let transcript = history.iter().map(Turn::transcript_line).collect::<Vec<_>>().join("\n");

    // Normalized layout: tools and history are one entry per line with no
    // blank separator lines, and tool names carry no trailing `, `.
    format!(
        "You are an assistant to a customer service agent focused on empathy, problem-solving, and clear communication. Answer the following questions as best you can. You have access to the following tools:

{tools}

The chat is in the following format:
Customer: the input from the customer
Agent: response from the agent
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)

The customer can not see lines starting in Action, Action Input, Observation, or Thought.

You have two options to respond with:

**Option 1:**
Use this if you need more information from the customer.
Use the following schema:

Thought: you should always think about what to do
Agent: response from the agent

**Option 2:**
Use this if you have enough information to take an action.
Use the following schema:

Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action

Begin!

{transcript}
"
    )
}
