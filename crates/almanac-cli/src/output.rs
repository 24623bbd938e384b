//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its result
//! accordingly: readable text for humans, stable JSON for scripts.

use serde::Serialize;
use serde_json::json;

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON, one object or array per result.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Print a plain confirmation message.
pub fn render_message(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    if mode.is_json() {
        println!("{}", serde_json::to_string(&json!({ "message": message }))?);
    } else {
        println!("{message}");
    }
    Ok(())
}

/// Print an applied-mutation count, with any planner replies and
/// suggestions carried through.
pub fn render_applied(
    mode: OutputMode,
    applied: usize,
    replies: &[String],
    suggestions: &[String],
) -> anyhow::Result<()> {
    if mode.is_json() {
        let value = json!({
            "applied": applied,
            "replies": replies,
            "suggestions": suggestions,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }
    for reply in replies {
        println!("{reply}");
    }
    println!("Applied {applied} change{}", if applied == 1 { "" } else { "s" });
    for note in suggestions {
        println!("Suggestion: {note}");
    }
    Ok(())
}

/// Print a serializable value as a JSON document (JSON mode only).
pub fn render_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_mode_is_detected() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Human.is_json());
    }
}
