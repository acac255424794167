//! Reasoning side of the chat simulator.
//!
//! The agent never acts on its own: it reads the transcript, asks the
//! completion service what to do next, and hands back turns.
//!
//! # Pipeline
//!
//! 1. **Prompt** (`prompt`) - transcript + action catalog → ReAct prompt
//! 2. **Completion** (`llm`) - pluggable `LlmClient`, OpenAI-compatible HTTP client
//! 3. **Scanning** (`scanner`) - completion text → `ParsedIntent`
//! 4. **Derivation** (`reasoning`) - intent → Agent / Action / Thought turns
//!
//! # Key Types
//!
//! - `ReasoningClient` - dedup guard + the pipeline above
//! - `ActionCatalog` - the actions the model may request, in name order

pub mod catalog;
pub mod llm;
pub mod prompt;
pub mod reasoning;
pub mod scanner;

pub use catalog::ActionCatalog;
pub use llm::{CompletionRequest, LlmClient, LlmError, OpenAiClient};
pub use reasoning::{ReasoningClient, ReasoningError, ReasoningOptions};
pub use scanner::ParsedIntent;
