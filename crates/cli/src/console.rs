use std::io::{self, Write};

use clichat_core::{Speaker, Turn};
use clichat_session::PresentationEvent;
use tokio::sync::mpsc;

const INTERNAL_PREFIX: &str = "  | ";

/// Which side of the screen a line belongs to: what the customer would see,
/// or the agent's internal activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    Conversation,
    Internal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedLine {
    pub lane: Lane,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputCommand {
    Customer(String),
    Agent(String),
    Quit,
    Empty,
}

pub fn parse_input(line: &str) -> InputCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim() == "/quit" {
        return InputCommand::Quit;
    }
    if let Some(text) = line.strip_prefix("/agent ") {
        return InputCommand::Agent(text.to_string());
    }
    if line.trim().is_empty() {
        return InputCommand::Empty;
    }
    InputCommand::Customer(line.to_string())
}

pub fn render_turn(turn: &Turn) -> RenderedLine {
    let lane = if turn.speaker().is_customer_visible() { Lane::Conversation } else { Lane::Internal };
    let text = match turn.speaker() {
        Speaker::Customer | Speaker::Agent | Speaker::ReasoningEngine | Speaker::Thought => {
            format!("{}: {}", turn.speaker().label(), turn.text())
        }
        Speaker::ActionRequest => format!("Action: {}\nActionInput: {}", turn.text(), turn.input()),
        Speaker::ActionResult => format!("Observation: {}", turn.text()),
    };
    RenderedLine { lane, text }
}

pub fn render_event(event: &PresentationEvent) -> Vec<RenderedLine> {
    match event {
        PresentationEvent::Turn(_) | PresentationEvent::Batch(_) => {
            event.turns().iter().map(render_turn).collect()
        }
        PresentationEvent::Error(error) => vec![RenderedLine {
            lane: Lane::Conversation,
            text: format!("error: {} ({error})", error.user_message()),
        }],
    }
}

pub fn write_line(out: &mut impl Write, line: &RenderedLine) -> io::Result<()> {
    match line.lane {
        Lane::Conversation => writeln!(out, "{}", line.text),
        Lane::Internal => {
            for part in line.text.lines() {
                writeln!(out, "{INTERNAL_PREFIX}{part}")?;
            }
            Ok(())
        }
    }
}

/// Drains presentation events to stdout until every sender is gone.
pub async fn print_events(mut events: mpsc::UnboundedReceiver<PresentationEvent>) {
    while let Some(event) = events.recv().await {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in render_event(&event) {
            if let Err(error) = write_line(&mut out, &line) {
                tracing::warn!(
                    event_name = "cli.console.write_failed",
                    error = %error,
                    "could not write to stdout"
                );
                return;
            }
        }
        if let Err(error) = out.flush() {
            tracing::debug!(event_name = "cli.console.flush_failed", error = %error, "flush failed");
        }
    }
}
