use clichat_agent::{prompt, ActionCatalog};

pub fn run() -> String {
    let catalog = ActionCatalog::default();

    let mut lines = vec![format!("action catalog ({} actions):", catalog.len())];
    lines.extend(catalog.iter().map(|(name, description)| format!("- {name}: {description}")));
    lines.push(String::new());
    lines.push("prompt for an empty conversation:".to_string());
    lines.push(prompt::assemble(&catalog, &[]));

    lines.join("\n")
}
