use std::collections::HashMap;

use crate::config::types::EntityTypeSettings;
use crate::content::sorter::SortSpec;

/// Default language
pub fn default_lang() -> String {
    "en".to_string()
}

/// Default translation-id field
pub fn default_translation_id() -> String {
    "slug".to_string()
}

pub fn default_true() -> bool {
    true
}

/// Name of the standard sub-generator in the registry
pub const STANDARD_SUBGENERATOR: &str = "standard";

/// Built-in settings for an entity type, derived from its lower-cased name.
///
/// Source files live under `<type>/`, entity pages land at
/// `<type>/{slug}.html`, taxonomy pages under `<type>/<taxonomy>/`. Derived
/// pages and feeds are off until a template or path is configured.
pub fn entity_type_defaults(entity_type: &str) -> EntityTypeSettings {
    let lower = entity_type.to_lowercase();

    EntityTypeSettings {
        name: entity_type.to_string(),
        paths: vec![lower.clone()],
        excludes: Vec::new(),
        mandatory: vec!["title".to_string(), "date".to_string()],
        default_template: lower.clone(),
        subgenerator: STANDARD_SUBGENERATOR.to_string(),
        sorter: SortSpec::default(),

        url: format!("{}/{{slug}}.html", lower),
        save_as: format!("{}/{{slug}}.html", lower),
        lang_url: format!("{}/{{slug}}-{{lang}}.html", lower),
        lang_save_as: format!("{}/{{slug}}-{{lang}}.html", lower),

        category_url: format!("{}/category/{{slug}}.html", lower),
        category_save_as: format!("{}/category/{{slug}}.html", lower),
        tag_url: format!("{}/tag/{{slug}}.html", lower),
        tag_save_as: format!("{}/tag/{{slug}}.html", lower),
        author_url: format!("{}/author/{{slug}}.html", lower),
        author_save_as: format!("{}/author/{{slug}}.html", lower),

        archive_template: None,
        category_template: None,
        tag_template: None,
        author_template: None,

        year_archive_save_as: None,
        month_archive_save_as: None,
        day_archive_save_as: None,

        direct_templates: Vec::new(),
        paginated_direct_templates: Vec::new(),
        direct_template_save_as: HashMap::new(),

        feed_atom: None,
        feed_rss: None,
        feed_all_atom: None,
        feed_all_rss: None,
        category_feed_atom: None,
        category_feed_rss: None,
        author_feed_atom: None,
        author_feed_rss: None,
        tag_feed_atom: None,
        tag_feed_rss: None,
        translation_feed_atom: None,
        translation_feed_rss: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_derive_from_type_name() {
        let settings = entity_type_defaults("Project");

        assert_eq!(settings.paths, vec!["project".to_string()]);
        assert_eq!(settings.default_template, "project");
        assert_eq!(settings.url, "project/{slug}.html");
        assert_eq!(settings.lang_save_as, "project/{slug}-{lang}.html");
        assert_eq!(settings.tag_url, "project/tag/{slug}.html");
        assert!(settings.archive_template.is_none());
        assert!(settings.feed_atom.is_none());
        assert_eq!(
            settings.mandatory,
            vec!["title".to_string(), "date".to_string()]
        );
    }
}
