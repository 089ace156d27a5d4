//! The flat token record shared by the tokenizer and the renderer.

use serde::{Deserialize, Serialize};

/// One structural unit of a tokenized document.
///
/// Block structure is flattened into `*_open`/`*_close` pairs (`nesting` of
/// `1` and `-1`) with leaves at `0`. Inline markup lives in the `children` of
/// an `inline` token. `level` is the nesting depth at which the token sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub tag: String,
    pub nesting: i8,
    pub level: usize,
    pub markup: String,
    pub block: bool,
    pub children: Option<Vec<Token>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Token {
    pub fn new(kind: impl Into<String>, tag: impl Into<String>, nesting: i8) -> Self {
        Self {
            kind: kind.into(),
            content: String::new(),
            tag: tag.into(),
            nesting,
            level: 0,
            markup: String::new(),
            block: false,
            children: None,
            attrs: Vec::new(),
            info: String::new(),
            hidden: false,
        }
    }

    /// A leaf `text` token.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new("text", "", 0)
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_open(&self) -> bool {
        self.nesting > 0
    }

    pub fn is_close(&self) -> bool {
        self.nesting < 0
    }

    /// The three-token heading sequence: open, inline holding `text`, close.
    pub fn heading(level: usize, text: &str) -> Vec<Token> {
        let tag = format!("h{level}");
        let markup = "#".repeat(level);
        let open = Token {
            markup: markup.clone(),
            block: true,
            ..Token::new("heading_open", tag.clone(), 1)
        };
        let inline = Token {
            level: 1,
            block: true,
            children: Some(vec![Token::text(text)]),
            ..Token::new("inline", "", 0)
        };
        let close = Token {
            markup,
            block: true,
            ..Token::new("heading_close", tag, -1)
        };
        vec![open, inline, close]
    }
}
