//! CommonMark text → token stream.
//!
//! Pipeline: text → Comrak AST → tokens. The stream follows the shape the
//! headings of a PageDump are synthesized in, so that content blocks and
//! headings can be concatenated into one document.

use super::token::Token;
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// Parser switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonMarkOptions {
    /// Soft line breaks become `hardbreak` tokens.
    pub breaks: bool,
    /// Recognise raw HTML. When off, HTML is kept as literal text.
    pub html: bool,
}

impl Default for CommonMarkOptions {
    fn default() -> Self {
        Self {
            breaks: true,
            html: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommonMarkTokenizer {
    options: CommonMarkOptions,
}

impl CommonMarkTokenizer {
    pub fn new(options: CommonMarkOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CommonMarkOptions {
        self.options
    }

    /// Tokenize `source` as a standalone CommonMark document.
    pub fn parse(&self, source: &str) -> Vec<Token> {
        let arena = Arena::new();
        let root = parse_document(&arena, source, &ComrakOptions::default());

        let mut stream = BlockStream {
            options: self.options,
            tokens: Vec::new(),
            level: 0,
        };
        stream.children(root);
        stream.tokens
    }
}

/// Pushes tokens while tracking depth, the way a block parser state does.
struct BlockStream {
    options: CommonMarkOptions,
    tokens: Vec<Token>,
    level: usize,
}

impl BlockStream {
    fn push(&mut self, mut token: Token) -> &mut Token {
        if token.nesting < 0 {
            self.level = self.level.saturating_sub(1);
        }
        token.level = self.level;
        if token.nesting > 0 {
            self.level += 1;
        }
        self.tokens.push(token);
        let last = self.tokens.len() - 1;
        &mut self.tokens[last]
    }

    fn push_block(&mut self, kind: &str, tag: &str, nesting: i8, markup: &str) -> &mut Token {
        let token = Token {
            markup: markup.to_string(),
            block: true,
            ..Token::new(kind, tag, nesting)
        };
        self.push(token)
    }

    fn children<'a>(&mut self, node: &'a AstNode<'a>) {
        for child in node.children() {
            self.block(child);
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Document => self.children(node),

            NodeValue::Paragraph => {
                let hidden = in_tight_list(node);
                self.push_block("paragraph_open", "p", 1, "").hidden = hidden;
                self.inline(node);
                self.push_block("paragraph_close", "p", -1, "").hidden = hidden;
            }

            NodeValue::Heading(heading) => {
                let tag = format!("h{}", heading.level);
                let markup = match (heading.setext, heading.level) {
                    (true, 1) => "=".to_string(),
                    (true, _) => "-".to_string(),
                    (false, level) => "#".repeat(level as usize),
                };
                self.push_block("heading_open", &tag, 1, &markup);
                self.inline(node);
                self.push_block("heading_close", &tag, -1, &markup);
            }

            NodeValue::BlockQuote => {
                self.push_block("blockquote_open", "blockquote", 1, ">");
                self.children(node);
                self.push_block("blockquote_close", "blockquote", -1, ">");
            }

            NodeValue::List(list) => {
                let (kind, tag) = match list.list_type {
                    ListType::Bullet => ("bullet_list", "ul"),
                    ListType::Ordered => ("ordered_list", "ol"),
                };
                let markup = list_markup(&list.list_type, list.delimiter, list.bullet_char);
                let open = self.push_block(&format!("{kind}_open"), tag, 1, &markup);
                if list.list_type == ListType::Ordered && list.start != 1 {
                    open.attrs.push(("start".to_string(), list.start.to_string()));
                }

                for (index, item) in node.children().enumerate() {
                    let item_open = self.push_block("list_item_open", "li", 1, &markup);
                    if list.list_type == ListType::Ordered {
                        item_open.info = (list.start + index).to_string();
                    }
                    self.children(item);
                    self.push_block("list_item_close", "li", -1, &markup);
                }
                self.push_block(&format!("{kind}_close"), tag, -1, &markup);
            }

            // Items are emitted by their list.
            NodeValue::Item(_) => self.children(node),

            NodeValue::CodeBlock(code) => {
                let token = if code.fenced {
                    let fence = char::from(code.fence_char)
                        .to_string()
                        .repeat(code.fence_length);
                    let token = self.push_block("fence", "code", 0, &fence);
                    token.info = code.info.clone();
                    token
                } else {
                    self.push_block("code_block", "code", 0, "")
                };
                token.content = code.literal;
            }

            NodeValue::ThematicBreak => {
                self.push_block("hr", "hr", 0, "---");
            }

            NodeValue::HtmlBlock(html) => {
                if self.options.html {
                    self.push_block("html_block", "", 0, "").content = html.literal;
                } else {
                    self.literal_paragraph(html.literal.trim_end());
                }
            }

            _ => self.children(node),
        }
    }

    /// An `inline` token holding the inline children of `node`.
    fn inline<'a>(&mut self, node: &'a AstNode<'a>) {
        let mut children = InlineStream::new(self.options);
        children.children(node);
        let children = children.finish();
        let token = Token {
            content: inline_source(&children),
            block: true,
            children: Some(children),
            ..Token::new("inline", "", 0)
        };
        self.push(token);
    }

    /// A paragraph of plain text lines, used for HTML when HTML is disabled.
    fn literal_paragraph(&mut self, text: &str) {
        self.push_block("paragraph_open", "p", 1, "");
        let mut inline = InlineStream::new(self.options);
        for (index, line) in text.lines().enumerate() {
            if index > 0 {
                inline.line_break(false);
            }
            inline.text(line);
        }
        let children = inline.finish();
        let token = Token {
            content: text.to_string(),
            block: true,
            children: Some(children),
            ..Token::new("inline", "", 0)
        };
        self.push(token);
        self.push_block("paragraph_close", "p", -1, "");
    }
}

/// Inline tokens of one block. Levels restart at zero.
struct InlineStream {
    options: CommonMarkOptions,
    tokens: Vec<Token>,
    level: usize,
}

impl InlineStream {
    fn new(options: CommonMarkOptions) -> Self {
        Self {
            options,
            tokens: Vec::new(),
            level: 0,
        }
    }

    fn finish(self) -> Vec<Token> {
        self.tokens
    }

    fn push(&mut self, mut token: Token) -> &mut Token {
        if token.nesting < 0 {
            self.level = self.level.saturating_sub(1);
        }
        token.level = self.level;
        if token.nesting > 0 {
            self.level += 1;
        }
        self.tokens.push(token);
        let last = self.tokens.len() - 1;
        &mut self.tokens[last]
    }

    /// Adjacent text is merged into one token.
    fn text(&mut self, text: &str) {
        if let Some(last) = self.tokens.last_mut() {
            if last.kind == "text" {
                last.content.push_str(text);
                return;
            }
        }
        self.push(Token::text(text));
    }

    fn line_break(&mut self, hard: bool) {
        if hard || self.options.breaks {
            self.push(Token::new("hardbreak", "br", 0));
        } else {
            self.push(Token::new("softbreak", "", 0));
        }
    }

    fn wrap<'a>(&mut self, node: &'a AstNode<'a>, name: &str, tag: &str, markup: &str) {
        self.push(Token {
            markup: markup.to_string(),
            ..Token::new(format!("{name}_open"), tag, 1)
        });
        self.children(node);
        self.push(Token {
            markup: markup.to_string(),
            ..Token::new(format!("{name}_close"), tag, -1)
        });
    }

    fn children<'a>(&mut self, node: &'a AstNode<'a>) {
        for child in node.children() {
            self.inline(child);
        }
    }

    fn inline<'a>(&mut self, node: &'a AstNode<'a>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Text(text) => self.text(&text),
            NodeValue::SoftBreak => self.line_break(false),
            NodeValue::LineBreak => self.line_break(true),
            NodeValue::Emph => self.wrap(node, "em", "em", "*"),
            NodeValue::Strong => self.wrap(node, "strong", "strong", "**"),
            NodeValue::Code(code) => {
                self.push(Token {
                    content: code.literal,
                    markup: "`".repeat(code.num_backticks.max(1)),
                    ..Token::new("code_inline", "code", 0)
                });
            }
            NodeValue::Link(link) => {
                let open = self.push(Token::new("link_open", "a", 1));
                open.attrs.push(("href".to_string(), link.url.clone()));
                if !link.title.is_empty() {
                    open.attrs.push(("title".to_string(), link.title.clone()));
                }
                self.children(node);
                self.push(Token::new("link_close", "a", -1));
            }
            NodeValue::Image(link) => {
                let mut alt = InlineStream::new(self.options);
                alt.children(node);
                let alt = alt.finish();
                let image = self.push(Token {
                    content: plain_text(&alt),
                    children: Some(alt),
                    ..Token::new("image", "img", 0)
                });
                image.attrs.push(("src".to_string(), link.url.clone()));
                image.attrs.push(("alt".to_string(), String::new()));
                if !link.title.is_empty() {
                    image.attrs.push(("title".to_string(), link.title.clone()));
                }
            }
            NodeValue::HtmlInline(html) => {
                if self.options.html {
                    self.push(Token {
                        content: html,
                        ..Token::new("html_inline", "", 0)
                    });
                } else {
                    self.text(&html);
                }
            }
            _ => self.children(node),
        }
    }
}

fn in_tight_list<'a>(paragraph: &'a AstNode<'a>) -> bool {
    let Some(item) = paragraph.parent() else {
        return false;
    };
    let Some(list) = item.parent() else {
        return false;
    };
    let item_is_item = matches!(item.data.borrow().value, NodeValue::Item(_));
    let tight = matches!(&list.data.borrow().value, NodeValue::List(list) if list.tight);
    item_is_item && tight
}

fn list_markup(list_type: &ListType, delimiter: ListDelimType, bullet: u8) -> String {
    match list_type {
        ListType::Bullet => char::from(bullet).to_string(),
        ListType::Ordered => match delimiter {
            ListDelimType::Period => ".".to_string(),
            ListDelimType::Paren => ")".to_string(),
        },
    }
}

/// Concatenated text of `tokens`, ignoring markup.
pub(crate) fn plain_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    for token in tokens {
        match token.kind.as_str() {
            "text" | "code_inline" | "html_inline" | "image" => text.push_str(&token.content),
            "softbreak" | "hardbreak" => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// CommonMark source for a run of inline tokens.
pub(crate) fn inline_source(tokens: &[Token]) -> String {
    let mut source = String::new();
    let mut links: Vec<&Token> = Vec::new();
    for token in tokens {
        match token.kind.as_str() {
            "text" | "html_inline" => source.push_str(&token.content),
            "softbreak" | "hardbreak" => source.push('\n'),
            "em_open" | "em_close" | "strong_open" | "strong_close" => {
                source.push_str(&token.markup)
            }
            "code_inline" => {
                source.push_str(&token.markup);
                source.push_str(&token.content);
                source.push_str(&token.markup);
            }
            "link_open" => {
                source.push('[');
                links.push(token);
            }
            "link_close" => {
                source.push(']');
                if let Some(open) = links.pop() {
                    source.push_str(&destination(open, "href"));
                }
            }
            "image" => {
                source.push_str("![");
                source.push_str(&token.content);
                source.push(']');
                source.push_str(&destination(token, "src"));
            }
            _ => {}
        }
    }
    source
}

fn destination(token: &Token, attr: &str) -> String {
    let url = token.attr(attr).unwrap_or_default();
    match token.attr("title") {
        Some(title) => format!("({url} \"{title}\")"),
        None => format!("({url})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.kind.as_str()).collect()
    }

    fn parse(source: &str) -> Vec<Token> {
        CommonMarkTokenizer::default().parse(source)
    }

    #[test]
    fn paragraph() {
        let tokens = parse("Hello *world*");
        assert_eq!(
            kinds(&tokens),
            ["paragraph_open", "inline", "paragraph_close"]
        );
        assert_eq!(tokens[0].tag, "p");
        assert_eq!(tokens[0].level, 0);
        assert_eq!(tokens[1].level, 1);
        assert_eq!(tokens[1].content, "Hello *world*");
        let inline = tokens[1].children.as_ref().unwrap();
        assert_eq!(kinds(inline), ["text", "em_open", "text", "em_close"]);
        assert_eq!(inline[2].level, 1);
        assert_eq!(tokens[2].nesting, -1);
    }

    #[test]
    fn soft_breaks_become_hard() {
        let tokens = parse("one\ntwo");
        let inline = tokens[1].children.as_ref().unwrap();
        assert_eq!(kinds(inline), ["text", "hardbreak", "text"]);
        assert_eq!(inline[1].tag, "br");

        let soft = CommonMarkTokenizer::new(CommonMarkOptions {
            breaks: false,
            html: false,
        })
        .parse("one\ntwo");
        assert_eq!(soft[1].children.as_ref().unwrap()[1].kind, "softbreak");
    }

    #[test]
    fn html_is_text_when_disabled() {
        let tokens = parse("a <b>bold</b> move");
        let inline = tokens[1].children.as_ref().unwrap();
        assert_eq!(kinds(inline), ["text"]);
        assert_eq!(inline[0].content, "a <b>bold</b> move");

        let block = parse("<div>\nhi\n</div>");
        assert_eq!(kinds(&block), ["paragraph_open", "inline", "paragraph_close"]);

        let enabled = CommonMarkTokenizer::new(CommonMarkOptions {
            breaks: true,
            html: true,
        })
        .parse("<div>\nhi\n</div>");
        assert_eq!(kinds(&enabled), ["html_block"]);
    }

    #[test]
    fn heading_markup() {
        let tokens = parse("### Third");
        assert_eq!(tokens[0].kind, "heading_open");
        assert_eq!(tokens[0].tag, "h3");
        assert_eq!(tokens[0].markup, "###");
        assert_eq!(tokens[1].content, "Third");
    }

    #[test]
    fn fence_keeps_info_and_literal() {
        let tokens = parse("```rust\nlet x = 1;\n```");
        assert_eq!(kinds(&tokens), ["fence"]);
        assert_eq!(tokens[0].info, "rust");
        assert_eq!(tokens[0].markup, "```");
        assert_eq!(tokens[0].content, "let x = 1;\n");
    }

    #[test]
    fn tight_list_hides_paragraphs() {
        let tokens = parse("- a\n- b");
        assert_eq!(
            kinds(&tokens),
            [
                "bullet_list_open",
                "list_item_open",
                "paragraph_open",
                "inline",
                "paragraph_close",
                "list_item_close",
                "list_item_open",
                "paragraph_open",
                "inline",
                "paragraph_close",
                "list_item_close",
                "bullet_list_close",
            ]
        );
        assert!(tokens[2].hidden);
        assert_eq!(tokens[2].level, 2);
        assert_eq!(tokens[3].level, 3);
    }

    #[test]
    fn ordered_list_start() {
        let tokens = parse("3. three\n4. four");
        assert_eq!(tokens[0].kind, "ordered_list_open");
        assert_eq!(tokens[0].attr("start"), Some("3"));
        assert_eq!(tokens[1].info, "3");
        assert_eq!(tokens[0].markup, ".");
    }

    #[test]
    fn blockquote_nesting() {
        let tokens = parse("> quoted");
        assert_eq!(
            kinds(&tokens),
            ["blockquote_open", "paragraph_open", "inline", "paragraph_close", "blockquote_close"]
        );
        assert_eq!(tokens[0].markup, ">");
        assert_eq!(tokens[4].level, 0);
    }

    #[test]
    fn links_and_images_carry_attrs() {
        let tokens = parse("[site](https://example.com \"T\") ![pic](a.png)");
        let inline = tokens[1].children.as_ref().unwrap();
        assert_eq!(
            kinds(inline),
            ["link_open", "text", "link_close", "text", "image"]
        );
        assert_eq!(inline[0].attr("href"), Some("https://example.com"));
        assert_eq!(inline[0].attr("title"), Some("T"));
        assert_eq!(inline[4].attr("src"), Some("a.png"));
        assert_eq!(inline[4].content, "pic");
        assert_eq!(
            tokens[1].content,
            "[site](https://example.com \"T\") ![pic](a.png)"
        );
    }

    #[test]
    fn empty_source_has_no_tokens() {
        assert!(parse("").is_empty());
    }
}
