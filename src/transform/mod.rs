//! Markdown transform chain for preview cards
//!
//! Stages run in a fixed order and any failure aborts the whole transform:
//!
//! 1. parse markdown into a block tree
//! 2. extract every code block into one synthetic block, followed by a trailer
//! 3. highlight the synthetic block
//! 4. convert it into an HTML node tree
//! 5. serialize the tree

mod highlight;
pub mod html;
mod tree;

pub use highlight::{HighlightedCode, Highlighter, CLASS_PREFIX, CSS_VARIABLES_THEME};
pub use html::HtmlNode;
pub use tree::{extract, parse, CodeNode, Node, Root, DEFAULT_LANG};

use crate::error::TransformError;

/// Markdown → highlighted HTML fragment
pub struct TransformChain {
    highlighter: Highlighter,
    trailer: String,
    allow_dangerous_html: bool,
}

impl TransformChain {
    /// Create a chain that appends `trailer` to the extracted code
    pub fn new(theme: &str, trailer: impl Into<String>) -> Self {
        Self {
            highlighter: Highlighter::new(theme),
            trailer: trailer.into(),
            allow_dangerous_html: true,
        }
    }

    /// Toggle raw HTML passthrough in the convert and serialize stages
    pub fn allow_dangerous_html(mut self, allow: bool) -> Self {
        self.allow_dangerous_html = allow;
        self
    }

    /// Run every stage over `markdown`
    pub fn transform(&self, markdown: &str) -> Result<String, TransformError> {
        let root = parse(markdown)?;
        let code = extract(&root, &self.trailer);
        tracing::debug!(
            lang = %code.lang,
            blocks = root.code_nodes().count(),
            "Extracted code for preview"
        );
        let highlighted = self.highlighter.highlight(&code.value, &code.lang)?;
        let tree = convert(&highlighted, self.allow_dangerous_html);
        Ok(html::serialize(&tree, self.allow_dangerous_html))
    }
}

/// Wrap highlighted tokens in the `pre > code` region.
///
/// Token markup is raw HTML, dropped unless raw passthrough is allowed.
pub fn convert(code: &HighlightedCode, allow_dangerous_html: bool) -> Vec<HtmlNode> {
    let class = format!("language-{}", code.lang);
    let tokens = if allow_dangerous_html {
        vec![HtmlNode::Raw(code.html.clone())]
    } else {
        Vec::new()
    };

    vec![HtmlNode::element(
        "pre",
        &[("class", "highlight"), ("data-lang", code.lang.as_str())],
        vec![HtmlNode::element("code", &[("class", class.as_str())], tokens)],
    )]
}
