//! Command parser: splits raw input into an explicit backend token and a body.

use heimdall_core::backend::BackendId;
use heimdall_core::command::ParsedCommand;
use heimdall_core::error::{Error, Result};

/// Recognized leading tokens, matched case-insensitively.
const PREFIXES: [(&str, BackendId); 4] = [
    ("claude", BackendId::Claude),
    ("deepseek", BackendId::Deepseek),
    ("aider", BackendId::Aider),
    ("multi", BackendId::Multi),
];

/// Look up a leading token in the prefix table.
pub fn lookup_prefix(token: &str) -> Option<BackendId> {
    let token = token.to_lowercase();
    PREFIXES
        .iter()
        .find(|(prefix, _)| *prefix == token)
        .map(|(_, id)| *id)
}

/// Parse a raw command.
///
/// An unknown first token is not an error: the whole input becomes the body
/// and the backend is left to heuristic routing.
pub fn parse(raw: &str) -> Result<ParsedCommand> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyCommand);
    }

    let (token, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (trimmed, ""),
    };

    let parsed = match lookup_prefix(token) {
        Some(backend) => ParsedCommand {
            explicit_backend: Some(backend),
            body: rest.to_string(),
        },
        None => ParsedCommand {
            explicit_backend: None,
            body: trimmed.to_string(),
        },
    };

    if parsed.body.is_empty() && parsed.explicit_backend != Some(BackendId::Multi) {
        return Err(Error::EmptyPrompt);
    }

    Ok(parsed)
}
