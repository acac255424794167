use std::collections::BTreeMap;

/// Actions the reasoning engine may request, keyed by name. Iteration is in
/// name order so prompts built from the catalog are reproducible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCatalog {
    actions: BTreeMap<String, String>,
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::from_entries([
            (
                "OrderSearch",
                "A search engine for orders. Useful for when you need to answer questions about current events. Input should be an order id, email address or customer's phone number.",
            ),
            (
                "ReturnOrderFlow",
                "Initiates a order return. Useful when the customer is trying to return an item and the order number is known. Input should be a order id that is confirmed by the customer.",
            ),
            (
                "EscalateToHuman",
                "Escalates chat to a human. Useful when the customer is confused or you do not know what to do next",
            ),
            (
                "CloseConversation",
                "Closes the conversation. Useful when the customer is done talking to the agent",
            ),
        ])
    }
}

impl ActionCatalog {
    pub fn from_entries<I, N, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            actions: entries
                .into_iter()
                .map(|(name, description)| (name.into(), description.into()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.actions.iter().map(|(name, description)| (name.as_str(), description.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
