use std::str::FromStr;
use std::sync::Arc;

use clichat_core::{
    ApplicationError, ConversationSnapshot, DomainError, LookupResult, OrderRecord, Speaker, Turn,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::directory::{LookupError, OrderDirectory};

pub const LOOKUP_BY_EMAIL: &str = "lookup_orders_by_email";
pub const LOOKUP_BY_PHONE: &str = "lookup_orders_by_phone_number";
pub const LOOKUP_BY_ORDER_NUMBER: &str = "lookup_order_by_order_number";

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("could not serialize lookup result: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ExecutorError> for ApplicationError {
    fn from(error: ExecutorError) -> Self {
        ApplicationError::Lookup(error.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendAction {
    Chat,
    OrderSearch,
    LookupOrdersByEmail,
    LookupOrdersByPhoneNumber,
    LookupOrderByOrderNumber,
    ReturnOrderFlow,
    CloseConversation,
    EscalateToHuman,
}

impl BackendAction {
    pub const ALL: [BackendAction; 8] = [
        Self::Chat,
        Self::OrderSearch,
        Self::LookupOrdersByEmail,
        Self::LookupOrdersByPhoneNumber,
        Self::LookupOrderByOrderNumber,
        Self::ReturnOrderFlow,
        Self::CloseConversation,
        Self::EscalateToHuman,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::OrderSearch => "OrderSearch",
            Self::LookupOrdersByEmail => LOOKUP_BY_EMAIL,
            Self::LookupOrdersByPhoneNumber => LOOKUP_BY_PHONE,
            Self::LookupOrderByOrderNumber => LOOKUP_BY_ORDER_NUMBER,
            Self::ReturnOrderFlow => "ReturnOrderFlow",
            Self::CloseConversation => "CloseConversation",
            Self::EscalateToHuman => "EscalateToHuman",
        }
    }
}

impl FromStr for BackendAction {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == value)
            .ok_or_else(|| DomainError::UnsupportedAction(value.to_string()))
    }
}

/// Runs the backend side of an action request against the order directory.
pub struct ActionExecutor {
    directory: Arc<dyn OrderDirectory>,
}

impl ActionExecutor {
    pub fn new(directory: Arc<dyn OrderDirectory>) -> Self {
        Self { directory }
    }

    /// Turns to emit for the snapshot, in order. Snapshots not triggered by
    /// an action request, and unknown actions, produce nothing.
    pub async fn execute(&self, snapshot: &ConversationSnapshot) -> Result<Vec<Turn>, ExecutorError> {
        let request = &snapshot.current;
        if request.speaker() != Speaker::ActionRequest {
            return Ok(Vec::new());
        }

        let action = match request.text().parse::<BackendAction>() {
            Ok(action) => action,
            Err(error) => {
                warn!(
                    event_name = "backend.action.unsupported",
                    action = request.text(),
                    error = %error,
                    "ignoring unsupported action"
                );
                return Ok(Vec::new());
            }
        };

        let input = request.input();
        info!(event_name = "backend.action.started", action = action.name(), input, "executing action");

        let turns = match action {
            BackendAction::Chat => vec![Turn::agent(input)],
            BackendAction::OrderSearch => vec![self.order_search(input).await?],
            BackendAction::LookupOrdersByEmail => {
                let orders = self.directory.orders_by_email(input).await?;
                vec![lookup_turn(LOOKUP_BY_EMAIL, input, orders)?]
            }
            BackendAction::LookupOrdersByPhoneNumber => {
                let orders = self.directory.orders_by_phone(input).await?;
                vec![lookup_turn(LOOKUP_BY_PHONE, input, orders)?]
            }
            BackendAction::LookupOrderByOrderNumber => {
                let orders = self.directory.order_by_number(input).await?.into_iter().collect();
                vec![lookup_turn(LOOKUP_BY_ORDER_NUMBER, input, orders)?]
            }
            BackendAction::ReturnOrderFlow => self.return_order(input).await?,
            BackendAction::CloseConversation => vec![Turn::agent("Goodbye")],
            BackendAction::EscalateToHuman => vec![Turn::agent("I'll transfer you to a human agent")],
        };

        info!(
            event_name = "backend.action.completed",
            action = action.name(),
            emitted_turns = turns.len(),
            "action executed"
        );
        Ok(turns)
    }

    // Email first, then phone, then order number; an unmatched key reports an
    // empty email lookup.
    async fn order_search(&self, key: &str) -> Result<Turn, ExecutorError> {
        let orders = self.directory.orders_by_email(key).await?;
        if !orders.is_empty() {
            return lookup_turn(LOOKUP_BY_EMAIL, key, orders);
        }

        let orders = self.directory.orders_by_phone(key).await?;
        if !orders.is_empty() {
            return lookup_turn(LOOKUP_BY_PHONE, key, orders);
        }

        if let Some(order) = self.directory.order_by_number(key).await? {
            return lookup_turn(LOOKUP_BY_ORDER_NUMBER, key, vec![order]);
        }

        lookup_turn(LOOKUP_BY_EMAIL, key, Vec::new())
    }

    async fn return_order(&self, order_number: &str) -> Result<Vec<Turn>, ExecutorError> {
        if self.directory.is_returnable(order_number).await? {
            return Ok(vec![
                Turn::action_result(format!("Return instructions sent for order {order_number}")),
                Turn::agent(format!(
                    "I've sent the return instructions for order {order_number} to your email."
                )),
            ]);
        }

        Ok(vec![Turn::action_result(format!("Invalid order number: {order_number}"))])
    }
}

fn lookup_turn(
    results_for: &str,
    lookup_by: &str,
    orders: Vec<OrderRecord>,
) -> Result<Turn, ExecutorError> {
    let payload = LookupResult::new(results_for, lookup_by, orders).to_pretty_json()?;
    Ok(Turn::action_result(payload))
}
