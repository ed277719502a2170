//! Syntax highlighting stage

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{
    styled_line_to_highlighted_html, ClassStyle, ClassedHTMLGenerator, IncludeBackground,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::error::TransformError;

/// Theme name that emits CSS classes instead of inline colors
pub const CSS_VARIABLES_THEME: &str = "css-variables";

/// Prefix of the generated token classes
pub const CLASS_PREFIX: &str = "hl-";

const FALLBACK_THEME: &str = "base16-ocean.dark";

const PLAIN_TEXT_TOKENS: &[&str] = &["text", "txt", "plain", "plaintext", "toml", "graphql"];

/// Tags with no bundled grammar, mapped to the closest one that ships with syntect
const GRAMMAR_ALIASES: &[(&str, &str)] = &[
    ("ts", "js"),
    ("typescript", "js"),
    ("tsx", "js"),
    ("jsx", "js"),
    ("mjs", "js"),
    ("cjs", "js"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("console", "bash"),
    ("shellscript", "bash"),
    ("scss", "css"),
    ("sass", "css"),
    ("less", "css"),
    ("jsonc", "json"),
    ("json5", "json"),
    ("vue", "html"),
    ("svelte", "html"),
    ("astro", "html"),
    ("mdx", "md"),
];

enum Style {
    Classed,
    Inline(Box<Theme>),
}

/// Highlighted code ready for conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedCode {
    pub lang: String,
    /// Token spans, already escaped
    pub html: String,
}

/// Syntect-backed highlighter with a fixed theme
pub struct Highlighter {
    syntax_set: SyntaxSet,
    style: Style,
}

impl Highlighter {
    /// Create a highlighter for a theme name.
    ///
    /// Unknown theme names fall back to `base16-ocean.dark`.
    pub fn new(theme: &str) -> Self {
        let style = if theme == CSS_VARIABLES_THEME {
            Style::Classed
        } else {
            let mut themes = ThemeSet::load_defaults().themes;
            let resolved = match themes.remove(theme) {
                Some(t) => t,
                None => {
                    tracing::warn!("Unknown highlight theme {:?}, using {}", theme, FALLBACK_THEME);
                    themes.remove(FALLBACK_THEME).unwrap_or_default()
                }
            };
            Style::Inline(Box::new(resolved))
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            style,
        }
    }

    /// Find the grammar for a language tag
    fn syntax_for(&self, lang: &str) -> Result<&SyntaxReference, TransformError> {
        let lower = lang.to_ascii_lowercase();
        if PLAIN_TEXT_TOKENS.contains(&lower.as_str()) {
            return Ok(self.syntax_set.find_syntax_plain_text());
        }
        let token = GRAMMAR_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, target)| *target)
            .unwrap_or(lang);
        self.syntax_set
            .find_syntax_by_token(token)
            .ok_or_else(|| TransformError::Highlight {
                lang: lang.to_string(),
            })
    }

    /// Tokenize `code` as `lang`
    pub fn highlight(&self, code: &str, lang: &str) -> Result<HighlightedCode, TransformError> {
        let syntax = self.syntax_for(lang)?;

        let html = match &self.style {
            Style::Classed => {
                let mut generator = ClassedHTMLGenerator::new_with_class_style(
                    syntax,
                    &self.syntax_set,
                    ClassStyle::SpacedPrefixed {
                        prefix: CLASS_PREFIX,
                    },
                );
                for line in LinesWithEndings::from(code) {
                    generator
                        .parse_html_for_line_which_includes_newline(line)
                        .map_err(|e| TransformError::Render(e.to_string()))?;
                }
                generator.finalize()
            }
            Style::Inline(theme) => {
                let mut lines = HighlightLines::new(syntax, theme);
                let mut out = String::new();
                for line in LinesWithEndings::from(code) {
                    let regions = lines
                        .highlight_line(line, &self.syntax_set)
                        .map_err(|e| TransformError::Render(e.to_string()))?;
                    let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                        .map_err(|e| TransformError::Render(e.to_string()))?;
                    out.push_str(&html);
                }
                out
            }
        };

        Ok(HighlightedCode {
            lang: lang.to_string(),
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classed_output() {
        let h = Highlighter::new(CSS_VARIABLES_THEME);
        let out = h.highlight("let x = 1;\n", "js").unwrap();
        assert_eq!(out.lang, "js");
        assert!(out.html.contains("class=\"hl-"));
        assert!(!out.html.contains("style="));
    }

    #[test]
    fn test_inline_theme_output() {
        let h = Highlighter::new("InspiredGitHub");
        let out = h.highlight("fn main() {}\n", "rust").unwrap();
        assert!(out.html.contains("style=\"color:"));
    }

    #[test]
    fn test_language_name_and_extension() {
        let h = Highlighter::new(CSS_VARIABLES_THEME);
        assert!(h.highlight("x\n", "javascript").is_ok());
        assert!(h.highlight("x\n", "JavaScript").is_ok());
        assert!(h.highlight("x\n", "text").is_ok());
    }

    #[test]
    fn test_aliased_languages_keep_their_tag() {
        let h = Highlighter::new(CSS_VARIABLES_THEME);
        for lang in ["ts", "typescript", "tsx", "jsx", "TSX", "shell", "zsh", "scss", "toml", "jsonc", "vue"] {
            let out = h
                .highlight("const a = 1;\n", lang)
                .unwrap_or_else(|e| panic!("{lang}: {e}"));
            assert_eq!(out.lang, lang);
        }
    }

    #[test]
    fn test_unknown_language_errors() {
        let h = Highlighter::new(CSS_VARIABLES_THEME);
        let err = h.highlight("x\n", "no-such-language").unwrap_err();
        assert!(matches!(err, TransformError::Highlight { lang } if lang == "no-such-language"));
    }

    #[test]
    fn test_escapes_markup() {
        let h = Highlighter::new(CSS_VARIABLES_THEME);
        let out = h.highlight("a < b\n", "text").unwrap();
        assert!(out.html.contains("&lt;"));
        assert!(!out.html.contains("a < b"));
    }
}
