//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all site templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Register all templates
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
        ])?;

        // Register custom filters
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result.split_whitespace().collect::<Vec<_>>().join(" ")))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexPostData {
    pub slug: String,
    pub title: String,
    pub published: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub slug: String,
    pub title: String,
    pub published: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub content: String,
    pub social_image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(f: fn(&tera::Value, &HashMap<String, tera::Value>) -> tera::Result<tera::Value>, v: &str, args: &[(&str, tera::Value)]) -> String {
        let args: HashMap<String, tera::Value> =
            args.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        f(&tera::Value::String(v.to_string()), &args)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_strip_html_filter() {
        assert_eq!(
            filter(strip_html_filter, "<p>Hello\n<b>there</b></p>", &[]),
            "Hello there"
        );
    }

    #[test]
    fn test_truncate_chars_filter() {
        let args = [("length", tera::Value::from(5))];
        assert_eq!(filter(truncate_chars_filter, "abcdefgh", &args), "abcde...");
        assert_eq!(filter(truncate_chars_filter, "abc", &args), "abc");
    }
}
