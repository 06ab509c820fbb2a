//! Context assembly and token budgeting
//!
//! Pure helpers consumed upstream of the request lifecycle: estimate what
//! attached context will cost, cut it down to a budget, and flatten
//! heterogeneous attachments into one prompt section.

use serde::{Deserialize, Serialize};

/// Marker appended when text is cut to fit a budget
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Rough token estimate: four characters per token, rounded up
pub fn estimate_token_count(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Cut text down to a token budget
///
/// Returns the input unchanged when it fits; otherwise the first
/// `max_tokens * 4` characters with [`TRUNCATION_MARKER`] appended.
/// Counted in characters, so the cut never splits a UTF-8 scalar.
pub fn truncate_to_token_budget(text: &str, max_tokens: usize) -> String {
    let max_chars = max_tokens * 4;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// One attachment a user pinned to the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContextItem {
    /// A whole file
    File {
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        content: String,
    },
    /// A selected code span
    Selection {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        content: String,
    },
    /// A diagnostic or runtime error
    Error { content: String },
    /// A diff hunk
    Diff { content: String },
}

/// Flatten attachments into one string with section headers
///
/// Sections appear in item order, separated by blank lines; an empty item
/// list yields an empty string.
pub fn build_context_string(items: &[ContextItem]) -> String {
    let sections: Vec<String> = items
        .iter()
        .map(|item| match item {
            ContextItem::File { label, language, content } => format!(
                "--- File: {} ({}) ---\n{}",
                label,
                language.as_deref().unwrap_or("unknown"),
                content
            ),
            ContextItem::Selection { language, content } => format!(
                "--- Selected code ({}) ---\n{}",
                language.as_deref().unwrap_or("unknown"),
                content
            ),
            ContextItem::Error { content } => format!("--- Error ---\n{}", content),
            ContextItem::Diff { content } => format!("--- Diff ---\n{}", content),
        })
        .collect();

    sections.join("\n\n")
}
