//! Lazy-loading placeholders for embedded iframes
//!
//! Raw `<iframe>` tags in post HTML are swapped for a card that shows the
//! embedded page's title and icon, plus a "Run" button. The real iframe is
//! only created client-side from the `data-iframeurl`/`data-iframeprops`
//! attributes once the reader asks for it.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::transform::html::{escape_attr, escape_text};

const LAUNCH_ICON: &str = include_str!("icons/launch.svg");
const PLAY_ICON: &str = include_str!("icons/play.svg");

const DEFAULT_WIDTH: &str = "100%";
const DEFAULT_HEIGHT: &str = "500";

lazy_static! {
    static ref IFRAME_RE: Regex =
        Regex::new(r"(?is)<iframe\b([^>]*)>(?:\s*</iframe\s*>)?").unwrap();
    static ref ATTR_RE: Regex = Regex::new(
        r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#
    )
    .unwrap();
    static ref HOST_RE: Regex = Regex::new(r"^(?:[a-zA-Z][a-zA-Z0-9+.-]*:)?//([^/?#:@]+)").unwrap();
}

/// Placeholder card rendered in place of an iframe
#[derive(Debug, Clone, PartialEq)]
pub struct IframePlaceholder {
    pub src: String,
    pub width: String,
    pub height: String,
    /// Remaining iframe attributes, serialized as a JSON object
    pub props_to_preserve: String,
    pub page_title: String,
    pub page_icon: String,
}

impl IframePlaceholder {
    /// Build a placeholder from parsed iframe attributes.
    ///
    /// Returns `None` when there is no `src` to embed.
    pub fn from_attributes(attrs: &[(String, String)]) -> Option<Self> {
        let get = |name: &str| {
            attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        };

        let src = get("src").filter(|s| !s.trim().is_empty())?;
        let host = host_of(&src);

        let mut preserved = serde_json::Map::new();
        for (key, value) in attrs {
            let lower = key.to_ascii_lowercase();
            if matches!(lower.as_str(), "src" | "width" | "height") {
                continue;
            }
            preserved.insert(key.clone(), serde_json::Value::String(value.clone()));
        }

        let page_title = get("title")
            .filter(|t| !t.trim().is_empty())
            .or_else(|| host.clone())
            .unwrap_or_else(|| src.clone());
        let page_icon = host
            .map(|h| format!("https://{}/favicon.ico", h))
            .unwrap_or_default();

        Some(Self {
            width: get("width").unwrap_or_else(|| DEFAULT_WIDTH.to_string()),
            height: get("height").unwrap_or_else(|| DEFAULT_HEIGHT.to_string()),
            props_to_preserve: serde_json::Value::Object(preserved).to_string(),
            page_title,
            page_icon,
            src,
        })
    }

    /// CSS height; bare numbers are pixels
    fn css_height(&self) -> String {
        if self.height.trim().parse::<f64>().is_ok() {
            format!("{}px", self.height.trim())
        } else {
            self.height.clone()
        }
    }

    /// Render the placeholder markup
    pub fn render(&self) -> String {
        let src_attr = escape_attr(&self.src);
        format!(
            concat!(
                r#"<div class="embed">"#,
                r#"<div class="embed__header">"#,
                r#"<div class="embed__header__favicon">"#,
                r#"<picture aria-hidden="true"><img src="{icon}" alt="" loading="lazy" decoding="async" data-nozoom="true"></picture>"#,
                r#"</div>"#,
                r#"<div class="embed__header__info">"#,
                r#"<p><span class="visually-hidden">An embedded webpage:</span>{title}</p>"#,
                r#"<a href="{src}" rel="nofollow noopener noreferrer" target="_blank">{src_text}</a>"#,
                r#"</div>"#,
                r#"<a href="{src}" class="button regular primary text-style-button-regular" rel="nofollow noopener noreferrer" target="_blank">"#,
                r#"<div aria-hidden="true" class="buttonIcon">{launch}</div>"#,
                r#"<div class="innerText">New tab</div>"#,
                r#"</a>"#,
                r#"</div>"#,
                r#"<div class="embed__placeholder" data-iframeurl="{src}" data-iframeprops="{props}" style="height: {height};">"#,
                r#"<button class="button regular primary-emphasized text-style-button-regular">"#,
                r#"<div aria-hidden="true" class="buttonIcon">{play}</div>"#,
                r#"<div class="innerText">Run</div>"#,
                r#"</button>"#,
                r#"</div>"#,
                r#"</div>"#
            ),
            icon = escape_attr(&self.page_icon),
            title = escape_text(&self.page_title),
            src = src_attr,
            src_text = escape_text(&self.src),
            launch = LAUNCH_ICON.trim(),
            props = escape_attr(&self.props_to_preserve),
            height = escape_attr(&self.css_height()),
            play = PLAY_ICON.trim(),
        )
    }
}

/// Parse the attribute list of a tag body such as ` src="x" allowfullscreen`
pub fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (caps[1].to_string(), value)
        })
        .collect()
}

/// Replace every `<iframe>` in an HTML fragment with its placeholder
pub fn replace_iframes(html: &str) -> String {
    IFRAME_RE
        .replace_all(html, |caps: &Captures| {
            let attrs = parse_attributes(&caps[1]);
            match IframePlaceholder::from_attributes(&attrs) {
                Some(placeholder) => placeholder.render(),
                None => {
                    tracing::debug!("Leaving iframe without src untouched");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

fn host_of(src: &str) -> Option<String> {
    HOST_RE
        .captures(src.trim())
        .map(|caps| caps[1].to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#" src="https://a.dev/x" width=300 title='Demo' allowfullscreen"#);
        assert_eq!(
            attrs,
            vec![
                ("src".to_string(), "https://a.dev/x".to_string()),
                ("width".to_string(), "300".to_string()),
                ("title".to_string(), "Demo".to_string()),
                ("allowfullscreen".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_placeholder_from_attributes() {
        let attrs = parse_attributes(
            r#"src="https://stackblitz.com/edit/demo?embed=1" height="400" loading="lazy""#,
        );
        let p = IframePlaceholder::from_attributes(&attrs).unwrap();
        assert_eq!(p.page_title, "stackblitz.com");
        assert_eq!(p.page_icon, "https://stackblitz.com/favicon.ico");
        assert_eq!(p.width, "100%");
        assert_eq!(p.props_to_preserve, r#"{"loading":"lazy"}"#);
        assert_eq!(p.css_height(), "400px");
    }

    #[test]
    fn test_non_numeric_height_kept() {
        let attrs = parse_attributes(r#"src="//example.com" height="50vh""#);
        let p = IframePlaceholder::from_attributes(&attrs).unwrap();
        assert_eq!(p.css_height(), "50vh");
        assert!(p.render().contains("style=\"height: 50vh;\""));
    }

    #[test]
    fn test_replace_iframes() {
        let html = r#"<p>Before</p><iframe src="https://codesandbox.io/embed/x" title="Sandbox"></iframe><p>After</p>"#;
        let out = replace_iframes(html);
        assert!(!out.contains("<iframe"));
        assert!(out.contains(r#"data-iframeurl="https://codesandbox.io/embed/x""#));
        assert!(out.contains("An embedded webpage:</span>Sandbox</p>"));
        assert!(out.contains(r#"data-iframeprops="{&quot;title&quot;:&quot;Sandbox&quot;}""#));
        assert!(out.contains("<div class=\"innerText\">Run</div>"));
        assert!(out.starts_with("<p>Before</p>"));
        assert!(out.ends_with("<p>After</p>"));
    }

    #[test]
    fn test_iframe_without_src_untouched() {
        let html = "<iframe title=\"x\"></iframe>";
        assert_eq!(replace_iframes(html), html);
    }
}
