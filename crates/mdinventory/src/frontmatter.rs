//! Tag extraction from leading metadata blocks
//!
//! Two block styles are recognised, each opened by a delimiter on the first
//! line and closed by the next occurrence of the same delimiter:
//!
//! ```text
//! ---                      +++
//! tags: [ia, prompt]       tags = ["ia", "prompt"]
//! ---                      +++
//! ```
//!
//! Only the `tags` key is read. A block that fails to parse yields no tags.

use serde::Deserialize;

/// Delimiter-based metadata block style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterStyle {
    /// `---` delimited YAML mapping
    Yaml,
    /// `+++` delimited TOML table
    Toml,
}

impl FrontMatterStyle {
    pub fn delimiter(self) -> &'static str {
        match self {
            FrontMatterStyle::Yaml => "---",
            FrontMatterStyle::Toml => "+++",
        }
    }

    /// Style whose delimiter forms the whole first line of `content`
    pub fn detect(content: &str) -> Option<Self> {
        [FrontMatterStyle::Yaml, FrontMatterStyle::Toml]
            .into_iter()
            .find(|style| opens_with(content, style.delimiter()))
    }
}

fn opens_with(content: &str, delimiter: &str) -> bool {
    let first_line = content.split('\n').next().unwrap_or("");
    first_line.strip_suffix('\r').unwrap_or(first_line) == delimiter
}

/// Text between the opening delimiter and the next occurrence of it.
///
/// The closing delimiter is found by a plain substring search starting just
/// past the opening one; `None` if the block is never closed.
pub fn block(content: &str, style: FrontMatterStyle) -> Option<&str> {
    let delimiter = style.delimiter();
    if !opens_with(content, delimiter) {
        return None;
    }
    let rest = &content[delimiter.len()..];
    rest.find(delimiter).map(|end| &rest[..end])
}

#[derive(Deserialize)]
struct YamlFrontMatter {
    #[serde(default)]
    tags: Option<serde_yaml::Value>,
}

#[derive(Deserialize)]
struct TomlFrontMatter {
    #[serde(default)]
    tags: Option<toml::Value>,
}

/// Tags declared in a `---` block
pub fn extract_yaml_tags(content: &str) -> Vec<String> {
    let Some(raw) = block(content, FrontMatterStyle::Yaml) else {
        return Vec::new();
    };
    match serde_yaml::from_str::<YamlFrontMatter>(raw) {
        Ok(YamlFrontMatter { tags: Some(value) }) => yaml_tags(value),
        _ => Vec::new(),
    }
}

fn yaml_tags(value: serde_yaml::Value) -> Vec<String> {
    match value {
        serde_yaml::Value::String(tag) => vec![tag],
        serde_yaml::Value::Sequence(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_yaml::Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Tags declared in a `+++` block
pub fn extract_toml_tags(content: &str) -> Vec<String> {
    let Some(raw) = block(content, FrontMatterStyle::Toml) else {
        return Vec::new();
    };
    match toml::from_str::<TomlFrontMatter>(raw) {
        Ok(TomlFrontMatter { tags: Some(value) }) => toml_tags(value),
        _ => Vec::new(),
    }
}

fn toml_tags(value: toml::Value) -> Vec<String> {
    match value {
        toml::Value::String(tag) => vec![tag],
        toml::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                toml::Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Tags from both block styles, YAML first, in declaration order
pub fn extract_tags(content: &str) -> Vec<String> {
    let mut tags = extract_yaml_tags(content);
    tags.extend(extract_toml_tags(content));
    tags
}
