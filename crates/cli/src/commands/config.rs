use std::env;
use std::fs;
use std::path::Path;

use clichat_core::config::{detect_config_path, AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

use super::CommandResult;

pub fn run(config_path: Option<&Path>) -> CommandResult {
    let options = LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("config", &error),
    };

    CommandResult::report(render(&config, config_path))
}

pub fn render(config: &AppConfig, config_path: Option<&Path>) -> String {
    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let file_label = config_file_path.as_deref();

    let api_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact_token(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());

    let fields: [(&str, String, &[&str]); 10] = [
        ("llm.provider", format!("{:?}", config.llm.provider), &["CLICHAT_LLM_PROVIDER"]),
        ("llm.api_key", api_key, &["CLICHAT_LLM_API_KEY", "OPENAI_API_KEY"]),
        ("llm.base_url", config.llm.base_url.clone(), &["CLICHAT_LLM_BASE_URL"]),
        ("llm.model", config.llm.model.clone(), &["CLICHAT_LLM_MODEL"]),
        ("llm.temperature", config.llm.temperature.to_string(), &["CLICHAT_LLM_TEMPERATURE"]),
        ("llm.timeout_secs", config.llm.timeout_secs.to_string(), &["CLICHAT_LLM_TIMEOUT_SECS"]),
        (
            "session.queue_capacity",
            config.session.queue_capacity.to_string(),
            &["CLICHAT_SESSION_QUEUE_CAPACITY"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["CLICHAT_LOGGING_LEVEL", "CLICHAT_LOG_LEVEL"],
        ),
        (
            "logging.file",
            config.logging.file.display().to_string(),
            &["CLICHAT_LOGGING_FILE", "CLICHAT_LOG_FILE"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["CLICHAT_LOGGING_FORMAT", "CLICHAT_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in fields {
        lines.push(render_line(
            key,
            &value,
            field_source(key, env_keys, config_file_doc.as_ref(), file_label),
        ));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use super::{contains_path, redact_token};

    #[test]
    fn tokens_keep_only_their_prefix() {
        assert_eq!(redact_token("sk-abc123"), "sk-***");
        assert_eq!(redact_token("plainsecret"), "<redacted>");
        assert_eq!(redact_token("   "), "<empty>");
    }

    #[test]
    fn dotted_paths_resolve_nested_tables() {
        let doc = "[llm]\nmodel = \"gpt-4\"\n".parse::<toml::Value>().expect("valid toml");

        assert!(contains_path(&doc, "llm.model"));
        assert!(!contains_path(&doc, "llm.api_key"));
        assert!(!contains_path(&doc, "session.queue_capacity"));
    }
}
