//! Minimal HTML node tree and serializer

/// A node in the HTML output tree
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<HtmlNode>,
    },
    Text(String),
    /// Pre-rendered markup, emitted verbatim when raw HTML is allowed
    Raw(String),
}

impl HtmlNode {
    pub fn element(tag: &str, attrs: &[(&str, &str)], children: Vec<HtmlNode>) -> Self {
        HtmlNode::Element {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children,
        }
    }
}

/// Serialize nodes to a string.
///
/// With `allow_dangerous_html` unset, raw nodes are escaped as text.
pub fn serialize(nodes: &[HtmlNode], allow_dangerous_html: bool) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node, allow_dangerous_html);
    }
    out
}

fn write_node(out: &mut String, node: &HtmlNode, allow_dangerous_html: bool) {
    match node {
        HtmlNode::Element {
            tag,
            attrs,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in attrs {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            for child in children {
                write_node(out, child, allow_dangerous_html);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        HtmlNode::Text(text) => out.push_str(&escape_text(text)),
        HtmlNode::Raw(html) if allow_dangerous_html => out.push_str(html),
        HtmlNode::Raw(html) => out.push_str(&escape_text(html)),
    }
}

/// Escape text content
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for double-quoted output
pub fn escape_attr(s: &str) -> String {
    escape_text(s)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_nested() {
        let tree = vec![HtmlNode::element(
            "pre",
            &[("class", "highlight"), ("data-lang", "js")],
            vec![HtmlNode::element(
                "code",
                &[],
                vec![HtmlNode::Text("a < b && \"c\"".to_string())],
            )],
        )];
        assert_eq!(
            serialize(&tree, true),
            r#"<pre class="highlight" data-lang="js"><code>a &lt; b &amp;&amp; "c"</code></pre>"#
        );
    }

    #[test]
    fn test_raw_passthrough_toggle() {
        let tree = vec![HtmlNode::Raw("<b>x</b>".to_string())];
        assert_eq!(serialize(&tree, true), "<b>x</b>");
        assert_eq!(serialize(&tree, false), "&lt;b&gt;x&lt;/b&gt;");
    }

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr(r#"{"a":'b'}"#), "{&quot;a&quot;:&#39;b&#39;}");
    }
}
