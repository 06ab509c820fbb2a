//! Fenced code block extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One fenced block pulled from a finished assistant response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// Opening fence with an optional word-character language tag, body up to
/// the closing fence.
static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(\w*)\n([\s\S]*?)```").expect("valid fence pattern"));

/// Extract fenced code blocks in document order
///
/// The language tag defaults to `"text"` when the fence has none; block
/// bodies are trimmed of leading and trailing whitespace. Operates on a
/// finished string, not a stream.
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    FENCE
        .captures_iter(text)
        .map(|caps| {
            let language = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|tag| !tag.is_empty())
                .unwrap_or("text");
            let code = caps.get(2).map_or("", |m| m.as_str()).trim();
            CodeBlock {
                language: language.to_string(),
                code: code.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_blocks_in_plain_text() {
        assert!(extract_code_blocks("Hello world").is_empty());
    }

    #[test]
    fn single_block_with_language() {
        let blocks = extract_code_blocks("Here:\n```js\nconst x=1;\n```\nDone");
        assert_eq!(
            blocks,
            vec![CodeBlock { language: "js".into(), code: "const x=1;".into() }]
        );
    }

    #[test]
    fn multiple_blocks_in_document_order() {
        let text = "```python\nprint(\"hi\")\n```\nSome text\n```javascript\nalert(\"hello\")\n```";
        let blocks = extract_code_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language, "python");
        assert_eq!(blocks[1].language, "javascript");
    }

    #[test]
    fn missing_language_defaults_to_text() {
        let blocks = extract_code_blocks("```\nplain text here\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "text");
    }

    #[test]
    fn code_is_trimmed() {
        let blocks = extract_code_blocks("```js\n  spaced code  \n```");
        assert_eq!(blocks[0].code, "spaced code");
    }

    #[test]
    fn multiline_block_is_kept_whole() {
        let blocks = extract_code_blocks("```ts\nline1\nline2\nline3\n```");
        assert_eq!(blocks[0].code, "line1\nline2\nline3");
    }
}
