//! Rewrites Roam flavoured block text into CommonMark.
//!
//! Roam and CommonMark disagree on a handful of constructs. Each disagreement
//! is handled by one [`NormalizationRule`]; [`normalize`] threads the content
//! through [`ALL_RULES`] in order and stops at the first rule that consumes it.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Rewritten content, and whether later rules must leave it alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalization {
    pub content: String,
    pub consumed: bool,
}

impl Normalization {
    fn pass(content: String) -> Self {
        Self {
            content,
            consumed: false,
        }
    }
}

/// A named text rewrite.
#[derive(Debug)]
pub struct NormalizationRule {
    pub name: &'static str,
    pub description: &'static str,
    apply: fn(&str) -> Normalization,
}

impl NormalizationRule {
    pub fn normalize(&self, content: &str) -> Normalization {
        trace!(rule = self.name, content, "normalizing");
        (self.apply)(content)
    }
}

impl PartialEq for NormalizationRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// Runs of CR/LF. The "followed by non-whitespace" half of the match is
// checked by hand since `regex` has no lookahead.
static PARA_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n]{2,}").expect("valid regex for paragraph breaks"));
static ROAM_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__([^_\r\n]+)__").expect("valid regex for roam italics"));

const CODE_FENCE: &str = "```";
const QUOTE_BREAK: &str = "\n>\n>";

pub static CODE_BLOCK_RULE: NormalizationRule = NormalizationRule {
    name: "CodeBlockRule",
    description: "content starting with ``` is one big code block; it is left as is \
                  and consumed so no other rule rewrites code",
    apply: normalize_code_block,
};

pub static BLOCK_QUOTE_RULE: NormalizationRule = NormalizationRule {
    name: "BlockQuoteRule",
    description: "content starting with `>` is one block quote spanning any number of \
                  blank lines, so paragraph breaks get explicit `>` continuation lines",
    apply: normalize_block_quote,
};

pub static ITALICS_RULE: NormalizationRule = NormalizationRule {
    name: "ItalicsRule",
    description: "Roam writes italic as __italic__, which CommonMark reads as strong; \
                  rewrite it as *italic*",
    apply: normalize_italics,
};

/// Every rule, in the order [`normalize`] applies them.
pub static ALL_RULES: [&NormalizationRule; 3] =
    [&CODE_BLOCK_RULE, &BLOCK_QUOTE_RULE, &ITALICS_RULE];

/// Apply [`ALL_RULES`] to `content`, stopping after the first consuming rule.
pub fn normalize(content: &str) -> String {
    let mut normalized = content.to_string();
    for rule in ALL_RULES {
        let result = rule.normalize(&normalized);
        normalized = result.content;
        if result.consumed {
            trace!(rule = rule.name, "content consumed");
            break;
        }
    }
    normalized
}

pub fn is_code_block(content: &str) -> bool {
    content.trim().starts_with(CODE_FENCE)
}

fn normalize_code_block(content: &str) -> Normalization {
    Normalization {
        content: content.to_string(),
        consumed: is_code_block(content),
    }
}

fn normalize_block_quote(content: &str) -> Normalization {
    if !content.starts_with('>') {
        return Normalization::pass(content.to_string());
    }

    let stripped = content.trim();
    let mut out = String::with_capacity(stripped.len() + 8);
    let mut last = 0;
    for run in PARA_BREAK.find_iter(stripped) {
        let followed_by_text = stripped[run.end()..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_whitespace());
        if !followed_by_text {
            continue;
        }
        out.push_str(&stripped[last..run.start()]);
        out.push_str(QUOTE_BREAK);
        last = run.end();
    }
    out.push_str(&stripped[last..]);
    Normalization::pass(out)
}

fn normalize_italics(content: &str) -> Normalization {
    Normalization::pass(ROAM_ITALIC.replace_all(content, "*$1*").into_owned())
}
