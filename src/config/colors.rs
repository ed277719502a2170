//! Color theme shared by the site and the preview cards

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Light and dark values for one semantic color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorValue {
    pub light: String,
    pub dark: String,
}

impl ColorValue {
    fn new(light: &str, dark: &str) -> Self {
        Self {
            light: light.to_string(),
            dark: dark.to_string(),
        }
    }
}

/// Semantic color name to light/dark values.
///
/// IndexMap keeps the YAML key order so the generated stylesheet is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTheme(IndexMap<String, ColorValue>);

impl Default for ColorTheme {
    fn default() -> Self {
        let mut colors = IndexMap::new();
        colors.insert("primary".to_string(), ColorValue::new("#153F66", "#8DBCE8"));
        colors.insert("background".to_string(), ColorValue::new("#FFFFFF", "#0A1016"));
        colors.insert("foreground".to_string(), ColorValue::new("#0A1016", "#FFFFFF"));
        colors.insert("surface".to_string(), ColorValue::new("#F0F5FA", "#15202B"));
        colors.insert("accent".to_string(), ColorValue::new("#5290CC", "#5290CC"));
        colors.insert("code-background".to_string(), ColorValue::new("#F5F8FB", "#111A22"));
        Self(colors)
    }
}

impl ColorTheme {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the light palette as CSS custom properties on `:root`
    pub fn to_css_variables(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.0 {
            css.push_str(&format!("--{}: {};\n", name, value.light));
        }
        css.push('}');
        css
    }
}

impl FromIterator<(String, ColorValue)> for ColorTheme {
    fn from_iter<I: IntoIterator<Item = (String, ColorValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
