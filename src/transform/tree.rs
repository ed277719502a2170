//! Markdown block tree: the parse and extract stages

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use std::ops::Range;

use crate::error::TransformError;

/// Language used when no code block declares one
pub const DEFAULT_LANG: &str = "javascript";

/// Top-level block of a parsed document
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Code { lang: Option<String>, value: String },
    /// Consecutive non-code events
    Markup(Vec<Event<'a>>),
}

/// Parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Root<'a> {
    pub children: Vec<Node<'a>>,
}

impl<'a> Root<'a> {
    /// Code nodes in document order
    pub fn code_nodes(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.children.iter().filter_map(|node| match node {
            Node::Code { lang, value } => Some((lang.as_deref(), value.as_str())),
            Node::Markup(_) => None,
        })
    }
}

/// The single code block left after extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeNode {
    pub lang: String,
    pub value: String,
}

/// Parse markdown into a block tree.
///
/// Unclosed code fences are rejected rather than implicitly closed at the
/// end of their container.
pub fn parse(markdown: &str) -> Result<Root<'_>, TransformError> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options).into_offset_iter();

    let mut children = Vec::new();
    let mut markup: Vec<Event> = Vec::new();
    let mut code: Option<(Option<String>, String)> = None;

    for (event, range) in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                if !markup.is_empty() {
                    children.push(Node::Markup(std::mem::take(&mut markup)));
                }
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        check_fence_closed(markdown, range)?;
                        info.split_whitespace().next().map(|l| l.to_string())
                    }
                    CodeBlockKind::Indented => None,
                };
                code = Some((lang, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, value)) = code.take() {
                    children.push(Node::Code { lang, value });
                }
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, value)) = code.as_mut() {
                    value.push_str(&text);
                }
            }
            other => markup.push(other),
        }
    }

    if !markup.is_empty() {
        children.push(Node::Markup(markup));
    }

    Ok(Root { children })
}

/// Collapse every code node into one synthetic block followed by `trailer`
pub fn extract(root: &Root<'_>, trailer: &str) -> CodeNode {
    let nodes: Vec<_> = root.code_nodes().collect();

    let lang = nodes
        .first()
        .and_then(|(lang, _)| *lang)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANG)
        .to_string();

    let joined = nodes
        .iter()
        .map(|(_, value)| *value)
        .collect::<Vec<_>>()
        .join("\n");

    CodeNode {
        lang,
        value: format!("{}\n{}", joined.trim(), trailer),
    }
}

/// Fail when the fenced block at `range` ran to the end of its container
/// without a closing fence.
///
/// The block's source starts at the opening fence; a closed block's last
/// line is the closing fence behind the same container prefix (`> `, list
/// indentation) as the opener.
fn check_fence_closed(markdown: &str, range: Range<usize>) -> Result<(), TransformError> {
    let line_start = markdown[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let prefix_width = markdown[line_start..range.start].len();

    let block = markdown[range.clone()].trim_end_matches(['\n', '\r']);
    let opener = block.lines().next().unwrap_or_default().trim_start_matches(' ');
    let Some(fence) = opener.chars().next().filter(|c| *c == '`' || *c == '~') else {
        return Ok(());
    };
    let fence_len = opener.chars().take_while(|c| *c == fence).count();

    let closed = block.lines().skip(1).last().is_some_and(|line| {
        let mut rest = line;
        for _ in 0..prefix_width {
            match rest.as_bytes().first() {
                Some(b' ') | Some(b'>') => rest = &rest[1..],
                _ => break,
            }
        }
        for _ in 0..3 {
            rest = rest.strip_prefix(' ').unwrap_or(rest);
        }
        let run = rest.chars().take_while(|c| *c == fence).count();
        run >= fence_len && rest[run..].trim().is_empty()
    });

    if closed {
        Ok(())
    } else {
        Err(TransformError::Parse {
            line: markdown[..range.start].matches('\n').count() + 1,
            message: format!("unclosed code fence `{}`", fence.to_string().repeat(fence_len)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_code_and_markup() {
        let md = "# Title\n\n```js\nconsole.log(1)\n```\n\nSome text\n\n```rust title=\"x\"\nfn main() {}\n```\n";
        let root = parse(md).unwrap();
        assert_eq!(root.children.len(), 4);
        let code: Vec<_> = root.code_nodes().collect();
        assert_eq!(
            code,
            vec![
                (Some("js"), "console.log(1)\n"),
                (Some("rust"), "fn main() {}\n")
            ]
        );
    }

    #[test]
    fn test_extract_joins_in_order() {
        let md = "```ts\nconst a = 1;\n```\n\ntext\n\n```\nconst b = 2;\n```\n";
        let root = parse(md).unwrap();
        let node = extract(&root, "TRAILER");
        assert_eq!(node.lang, "ts");
        assert_eq!(node.value, "const a = 1;\n\nconst b = 2;\nTRAILER");
    }

    #[test]
    fn test_extract_defaults_to_javascript() {
        let root = parse("# Just a heading\n\nNo code here.").unwrap();
        let node = extract(&root, "fn render() {}");
        assert_eq!(node.lang, DEFAULT_LANG);
        assert_eq!(node.value, "\nfn render() {}");
    }

    #[test]
    fn test_extract_first_block_without_lang() {
        let root = parse("```\nplain\n```\n\n```python\nprint(1)\n```\n").unwrap();
        assert_eq!(extract(&root, "").lang, DEFAULT_LANG);
    }

    #[test]
    fn test_indented_code_is_a_code_node() {
        let root = parse("Para\n\n    indented code\n").unwrap();
        let code: Vec<_> = root.code_nodes().collect();
        assert_eq!(code, vec![(None, "indented code\n")]);
    }

    #[test]
    fn test_unclosed_fence_is_parse_error() {
        let err = parse("Intro\n\n```js\nconsole.log(1)\n").unwrap_err();
        match err {
            TransformError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_shorter_fence_does_not_close() {
        assert!(parse("````md\n```js\nx\n```\n").is_err());
        assert!(parse("````md\n```js\nx\n```\n````\n").is_ok());
    }

    #[test]
    fn test_tilde_fence_balanced() {
        assert!(parse("~~~\n```\n~~~\n").is_ok());
    }

    #[test]
    fn test_fence_inside_html_block_is_not_code() {
        let root = parse("<div>\n```\n</div>\n\nText\n").unwrap();
        assert_eq!(root.code_nodes().count(), 0);
    }

    #[test]
    fn test_blockquote_fences() {
        assert!(parse("> ```js\n> x\n> ```\n\nafter\n").is_ok());
        match parse("Intro\n\n> ```js\n> x\n\nafter\n") {
            Err(TransformError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_list_item_fence_closed() {
        assert!(parse("- item\n\n  ```rust\n  fn a() {}\n  ```\n").is_ok());
    }

    #[test]
    fn test_deeply_indented_fence_does_not_close() {
        assert!(parse("```\ncode\n    ```\n").is_err());
    }
}
