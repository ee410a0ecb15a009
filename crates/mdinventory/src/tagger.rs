//! File selection by required tags
//!
//! A file matches when any required tag is either declared in its metadata
//! block or appears in its text as an inline `#tag` marker.

use crate::frontmatter::extract_tags;
use std::path::Path;
use tracing::debug;

/// One required tag in both comparison forms
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequiredTag {
    /// Compared against declared tags (leading `#` stripped)
    key: String,
    /// Searched for in the raw text (leading `#` ensured)
    marker: String,
}

impl RequiredTag {
    fn new(raw: &str) -> Self {
        let key = raw.strip_prefix('#').unwrap_or(raw).to_string();
        let marker = if raw.starts_with('#') {
            raw.to_string()
        } else {
            format!("#{}", raw)
        };
        Self { key, marker }
    }
}

/// Compiled tag filter for a task
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    tags: Vec<RequiredTag>,
}

impl TagFilter {
    /// Build a filter; an empty list matches every file
    pub fn new<S: AsRef<str>>(required_tags: &[S]) -> Self {
        Self {
            tags: required_tags
                .iter()
                .map(|t| RequiredTag::new(t.as_ref()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Check already-loaded file text against the filter
    pub fn matches_content(&self, content: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let declared = extract_tags(content);
        let declared_match = declared
            .iter()
            .any(|tag| self.tags.iter().any(|req| req.key == *tag));
        if declared_match {
            return true;
        }

        self.tags.iter().any(|req| content.contains(&req.marker))
    }

    /// Read a file and check it; unreadable files never match
    pub fn matches_file(&self, path: &Path) -> bool {
        if self.is_empty() {
            return true;
        }

        match std::fs::read(path) {
            Ok(bytes) => self.matches_content(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Excluding unreadable file");
                false
            }
        }
    }
}

/// Whether the file at `path` satisfies any of `required_tags`
pub fn file_contains_tags<S: AsRef<str>>(path: &Path, required_tags: &[S]) -> bool {
    TagFilter::new(required_tags).matches_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        yaml: std::path::PathBuf,
        toml: std::path::PathBuf,
        inline: std::path::PathBuf,
        plain: std::path::PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().expect("create temp dir");
        let write = |name: &str, content: &str| {
            let path = temp.path().join(name);
            fs::write(&path, content).expect("write fixture");
            path
        };

        let yaml = write(
            "yaml.md",
            "---\ntags: [yaml_tag, shared]\n---\nContent with #inline_tag.",
        );
        let toml = write("toml.md", "+++\ntags = [\"toml_tag\", \"shared\"]\n+++\nBody.");
        let inline = write("inline.md", "Some text\n```\nlet x = 1; #code_tag\n```\n");
        let plain = write("plain.md", "Nothing to see here.");

        Fixture {
            yaml,
            toml,
            inline,
            plain,
            _temp: temp,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let fx = fixture();
        let none: [&str; 0] = [];
        assert!(file_contains_tags(&fx.plain, &none));
        assert!(file_contains_tags(&fx._temp.path().join("missing.md"), &none));
    }

    #[test]
    fn test_declared_yaml_tags() {
        let fx = fixture();
        assert!(file_contains_tags(&fx.yaml, &["yaml_tag"]));
        assert!(file_contains_tags(&fx.yaml, &["#yaml_tag"]));
        assert!(!file_contains_tags(&fx.yaml, &["toml_tag"]));
    }

    #[test]
    fn test_declared_toml_tags() {
        let fx = fixture();
        assert!(file_contains_tags(&fx.toml, &["toml_tag"]));
        assert!(file_contains_tags(&fx.toml, &["#shared"]));
        assert!(!file_contains_tags(&fx.toml, &["yaml_tag"]));
    }

    #[test]
    fn test_inline_markers() {
        let fx = fixture();
        assert!(file_contains_tags(&fx.yaml, &["inline_tag"]));
        assert!(file_contains_tags(&fx.inline, &["#code_tag"]));
        assert!(file_contains_tags(&fx.inline, &["code_tag"]));
        assert!(!file_contains_tags(&fx.plain, &["code_tag"]));
    }

    #[test]
    fn test_any_required_tag_suffices() {
        let fx = fixture();
        assert!(file_contains_tags(&fx.toml, &["absent", "toml_tag"]));
        assert!(!file_contains_tags(&fx.plain, &["absent", "other"]));
    }

    #[test]
    fn test_unreadable_file_excluded() {
        let fx = fixture();
        assert!(!file_contains_tags(&fx._temp.path().join("missing.md"), &["shared"]));
    }

    #[test]
    fn test_declared_comparison_is_exact() {
        let filter = TagFilter::new(&["IA"]);
        assert!(!filter.matches_content("---\ntags: [ia]\n---\n"));

        // Only one leading '#' is stripped from the required tag.
        let filter = TagFilter::new(&["##ia"]);
        assert!(!filter.matches_content("---\ntags: [ia]\n---\n"));
        assert!(filter.matches_content("---\ntags: ['#ia']\n---\n"));
    }

    #[test]
    fn test_declared_hash_tag_not_stripped() {
        // Declared tags are compared verbatim.
        let filter = TagFilter::new(&["ia"]);
        assert!(!filter.matches_content("---\ntags: ['#x']\n---\nbody"));
        assert!(filter.matches_content("---\ntags: [ia, prompt]\n---\nbody"));
    }

    #[test]
    fn test_inline_search_ignores_metadata_parse_failure() {
        let filter = TagFilter::new(&["ia"]);
        assert!(filter.matches_content("---\ntags: [broken\n---\nsee #ia"));
        assert!(!filter.matches_content("---\ntags: [broken\n---\nsee ia"));
    }

    #[test]
    fn test_inline_marker_is_prefix_substring() {
        let filter = TagFilter::new(&["ia"]);
        assert!(filter.matches_content("tagged #iago"));
    }
}
