//! Format implementations
//!
//! `pagedump` reads the JSON export of the Roam extension. The others write a
//! graph out, always starting from its root page.

pub mod commonmark;
pub mod markdown;
pub mod pagedump;
pub mod tokens;

pub use commonmark::CommonMarkFormat;
pub use markdown::MarkdownFormat;
pub use pagedump::PageDumpFormat;
pub use tokens::TokensFormat;

use crate::error::PublishError;
use crate::tokenize::TokenizeOptions;
use std::collections::HashMap;

/// Apply `normalize`, `breaks` and `html` parameters on top of `base`.
pub(crate) fn tokenize_options_from_params(
    base: TokenizeOptions,
    params: &HashMap<String, String>,
) -> Result<TokenizeOptions, PublishError> {
    let mut options = base;
    for (key, value) in params {
        let flag = parse_bool_param(key, value)?;
        match key.as_str() {
            "normalize" => options.normalize = flag,
            "breaks" => options.commonmark.breaks = flag,
            "html" => options.commonmark.html = flag,
            other => {
                return Err(PublishError::NotSupported(format!(
                    "unknown tokenize parameter '{other}'"
                )))
            }
        }
    }
    Ok(options)
}

fn parse_bool_param(key: &str, value: &str) -> Result<bool, PublishError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(PublishError::NotSupported(format!(
            "invalid boolean '{other}' for parameter '{key}'"
        ))),
    }
}
