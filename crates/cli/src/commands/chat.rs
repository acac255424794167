use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clichat_agent::OpenAiClient;
use clichat_backend::FixtureOrderDirectory;
use clichat_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use clichat_core::Turn;
use clichat_session::{ChannelSink, Session, SessionOptions, TranscriptCoordinator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::{CommandResult, EXIT_RUNTIME};
use crate::console::{self, InputCommand};
use crate::logging;

const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

#[derive(Clone, Debug, Default)]
pub struct ChatArgs {
    pub config: Option<PathBuf>,
    pub model: Option<String>,
    pub log_level: Option<String>,
}

impl ChatArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                llm_model: self.model.clone(),
                log_level: self.log_level.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

pub fn run(args: ChatArgs) -> CommandResult {
    let config = match AppConfig::load(args.load_options()) {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("chat", &error),
    };

    if let Err(error) = logging::init_logging(&config.logging) {
        return CommandResult::failure("chat", "logging", &format!("{error:#}"), EXIT_RUNTIME);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure("chat", "runtime", &error.to_string(), EXIT_RUNTIME),
    };

    let outcome = runtime.block_on(run_session(config));
    // Stdin reads run on a blocking thread that cannot be interrupted.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    match outcome {
        Ok(turns) => {
            CommandResult::success("chat", &format!("conversation ended after {turns} turns"))
        }
        Err(error) => CommandResult::failure("chat", "session", &format!("{error:#}"), EXIT_RUNTIME),
    }
}

async fn run_session(config: AppConfig) -> Result<usize> {
    let llm = OpenAiClient::from_config(&config.llm).context("could not build completion client")?;
    let (sink, events) = ChannelSink::channel();
    let session = Session::start(
        SessionOptions::from_config(&config),
        Arc::new(llm),
        Arc::new(FixtureOrderDirectory::demo()),
        Arc::new(sink),
    );
    info!(
        event_name = "cli.chat.started",
        correlation_id = %session.session_id(),
        model = %config.llm.model,
        "chat session started"
    );

    let printer = tokio::spawn(console::print_events(events));
    let coordinator = session.coordinator();
    let outcome = read_input(&coordinator).await;
    let turns = coordinator.len().await;

    info!(
        event_name = "cli.chat.stopping",
        correlation_id = %session.session_id(),
        turns,
        "chat session stopping"
    );
    drop(coordinator);
    session.shutdown().await;
    if tokio::time::timeout(SHUTDOWN_GRACE, printer).await.is_err() {
        tracing::debug!(event_name = "cli.console.drain_timeout", "presentation did not drain");
    }

    outcome.map(|()| turns)
}

async fn read_input(coordinator: &TranscriptCoordinator) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("could not read from stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            return Ok(());
        };

        match console::parse_input(&line) {
            InputCommand::Quit => return Ok(()),
            InputCommand::Empty => {}
            InputCommand::Customer(text) => coordinator.submit(Turn::customer(text)).await?,
            InputCommand::Agent(text) => coordinator.submit(Turn::agent(text)).await?,
        }
    }
}
