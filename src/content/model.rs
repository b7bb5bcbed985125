use std::collections::HashMap;
use std::path::PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Published entity, listed everywhere
    Published,

    /// Draft entity, gets a page but stays out of listings
    Draft,

    /// Hidden entity, gets a page but stays out of listings and feeds
    Hidden,
}

impl Status {
    /// Parse a status string (case-insensitive). Unknown values return None
    /// so the caller can log and skip the file.
    pub fn parse(value: &str) -> Option<Status> {
        match value.to_lowercase().as_str() {
            "published" => Some(Status::Published),
            "draft" => Some(Status::Draft),
            "hidden" => Some(Status::Hidden),
            _ => None,
        }
    }
}

/// A content item belonging to a user-defined entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Entity type this item belongs to
    pub entity_type: String,

    /// Absolute path to the source file
    pub path: PathBuf,

    /// Path relative to the content base directory
    pub relative_path: PathBuf,

    /// Title (always mandatory)
    pub title: String,

    /// Slug from front matter, title, or file stem
    pub slug: String,

    /// Raw status string from front matter
    pub status: String,

    /// Date from front matter, if any
    pub date: Option<DateTime<Utc>>,

    /// Language of this item
    pub lang: String,

    /// Value of the configured translation-id field
    pub translation_id: String,

    /// Template used to render this item
    pub template: String,

    /// URL for the rendered page
    pub url: String,

    /// Output path for the rendered page
    pub save_as: PathBuf,

    /// Whether the save-as path came from front matter
    pub override_save_as: bool,

    /// Category, if any
    pub category: Option<String>,

    /// Tags
    pub tags: Vec<String>,

    /// Authors
    pub authors: Vec<String>,

    /// Optional summary
    pub summary: Option<String>,

    /// Body content with front matter stripped
    pub content: String,

    /// Remaining front matter fields
    pub metadata: HashMap<String, serde_yaml::Value>,
}

impl Entity {
    /// Parsed status, None for unknown values
    pub fn status(&self) -> Option<Status> {
        Status::parse(&self.status)
    }

    /// Metadata field as a string, if present and scalar
    pub fn metadata_str(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// A taxonomy term (tag, category, or author) with its page locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Term {
    /// Display name
    pub name: String,

    /// Slugified name used in URL patterns
    pub slug: String,

    /// URL for the term page
    pub url: String,

    /// Output path for the term page
    pub save_as: PathBuf,

    /// Page name (save-as without extension) for templates
    pub page_name: String,
}

impl Term {
    /// Build a term from its name and the resolved url/save-as patterns.
    pub fn new(name: &str, url_pattern: &str, save_as_pattern: &str) -> Self {
        let slug = slug::slugify(name);
        let mut vars = HashMap::new();
        vars.insert("slug", slug.clone());
        vars.insert("name", name.to_string());

        let url = crate::utils::format_pattern(url_pattern, &vars, None);
        let save_as = crate::utils::format_pattern(save_as_pattern, &vars, None);
        let page_name = crate::utils::page_name(&save_as);

        Term {
            name: name.to_string(),
            slug,
            url,
            save_as: PathBuf::from(save_as),
            page_name,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(Status::parse("published"), Some(Status::Published));
        assert_eq!(Status::parse("Draft"), Some(Status::Draft));
        assert_eq!(Status::parse("HIDDEN"), Some(Status::Hidden));
        assert_eq!(Status::parse("foo"), None);
    }

    #[test]
    fn test_term_from_patterns() {
        let term = Term::new(
            "Rust Lang",
            "projects/tag/{slug}.html",
            "projects/tag/{slug}.html",
        );

        assert_eq!(term.slug, "rust-lang");
        assert_eq!(term.url, "projects/tag/rust-lang.html");
        assert_eq!(term.save_as, PathBuf::from("projects/tag/rust-lang.html"));
        assert_eq!(term.page_name, "projects/tag/rust-lang");
    }
}
