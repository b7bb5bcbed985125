use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::content::sorter::SortSpec;

/// Site-wide configuration consulted by every entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Default language; entities in other languages are translations
    #[serde(default = "defaults::default_lang")]
    pub default_lang: String,

    /// Ask the writer for relative URLs
    #[serde(default)]
    pub relative_urls: bool,

    /// Sort archive groups newest first
    #[serde(default = "defaults::default_true")]
    pub newest_first_archives: bool,

    /// Reverse the category name ordering
    #[serde(default)]
    pub reverse_category_order: bool,

    /// Log read failures with full detail
    #[serde(default)]
    pub debug: bool,

    /// Front matter field that links translations of the same item
    #[serde(default = "defaults::default_translation_id")]
    pub translation_id: String,

    /// Directory for the parsed-entity cache; None disables caching
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Settings applied to every entity type before its own overrides
    #[serde(default)]
    pub entity_defaults: EntityTypeOverrides,

    /// Declared entity types and their overrides
    #[serde(default)]
    pub entity_types: BTreeMap<String, EntityTypeOverrides>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            default_lang: defaults::default_lang(),
            relative_urls: false,
            newest_first_archives: true,
            reverse_category_order: false,
            debug: false,
            translation_id: defaults::default_translation_id(),
            cache_dir: None,
            entity_defaults: EntityTypeOverrides::default(),
            entity_types: BTreeMap::new(),
        }
    }
}

/// Per-type settings overlay; every field is optional and falls through to
/// the site-wide overlay and then the built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntityTypeOverrides {
    /// Source paths, relative to the content base
    pub paths: Option<Vec<String>>,

    /// Exclude glob patterns
    pub excludes: Option<Vec<String>>,

    /// Mandatory front matter fields ("title" is always enforced)
    pub mandatory: Option<Vec<String>>,

    /// Template used when an entity names none
    pub default_template: Option<String>,

    /// Sub-generator implementation name
    pub subgenerator: Option<String>,

    /// Sort order for canonical published entities
    pub sorter: Option<SortSpec>,

    /// URL pattern for entity pages
    pub url: Option<String>,

    /// Save-as pattern for entity pages
    pub save_as: Option<String>,

    /// URL pattern for translated entity pages
    pub lang_url: Option<String>,

    /// Save-as pattern for translated entity pages
    pub lang_save_as: Option<String>,

    /// Category page patterns
    pub category_url: Option<String>,
    pub category_save_as: Option<String>,

    /// Tag page patterns
    pub tag_url: Option<String>,
    pub tag_save_as: Option<String>,

    /// Author page patterns
    pub author_url: Option<String>,
    pub author_save_as: Option<String>,

    /// Templates for derived pages; absent means the page kind is skipped
    pub archive_template: Option<String>,
    pub category_template: Option<String>,
    pub tag_template: Option<String>,
    pub author_template: Option<String>,

    /// Period archive save-as patterns (support `{date:FMT}`)
    pub year_archive_save_as: Option<String>,
    pub month_archive_save_as: Option<String>,
    pub day_archive_save_as: Option<String>,

    /// Direct (non-entity) templates to render
    pub direct_templates: Option<Vec<String>>,

    /// Direct templates that get the entity list for pagination
    pub paginated_direct_templates: Option<Vec<String>>,

    /// Save-as overrides per direct template; an empty string disables one
    pub direct_template_save_as: Option<HashMap<String, String>>,

    /// Feed paths; absent means the feed is skipped
    pub feed_atom: Option<String>,
    pub feed_rss: Option<String>,
    pub feed_all_atom: Option<String>,
    pub feed_all_rss: Option<String>,
    pub category_feed_atom: Option<String>,
    pub category_feed_rss: Option<String>,
    pub author_feed_atom: Option<String>,
    pub author_feed_rss: Option<String>,
    pub tag_feed_atom: Option<String>,
    pub tag_feed_rss: Option<String>,
    pub translation_feed_atom: Option<String>,
    pub translation_feed_rss: Option<String>,
}

/// Fully resolved settings for one entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTypeSettings {
    /// Entity type name as declared
    pub name: String,

    pub paths: Vec<String>,
    pub excludes: Vec<String>,
    pub mandatory: Vec<String>,
    pub default_template: String,
    pub subgenerator: String,
    pub sorter: SortSpec,

    pub url: String,
    pub save_as: String,
    pub lang_url: String,
    pub lang_save_as: String,

    pub category_url: String,
    pub category_save_as: String,
    pub tag_url: String,
    pub tag_save_as: String,
    pub author_url: String,
    pub author_save_as: String,

    pub archive_template: Option<String>,
    pub category_template: Option<String>,
    pub tag_template: Option<String>,
    pub author_template: Option<String>,

    pub year_archive_save_as: Option<String>,
    pub month_archive_save_as: Option<String>,
    pub day_archive_save_as: Option<String>,

    pub direct_templates: Vec<String>,
    pub paginated_direct_templates: Vec<String>,
    pub direct_template_save_as: HashMap<String, String>,

    pub feed_atom: Option<String>,
    pub feed_rss: Option<String>,
    pub feed_all_atom: Option<String>,
    pub feed_all_rss: Option<String>,
    pub category_feed_atom: Option<String>,
    pub category_feed_rss: Option<String>,
    pub author_feed_atom: Option<String>,
    pub author_feed_rss: Option<String>,
    pub tag_feed_atom: Option<String>,
    pub tag_feed_rss: Option<String>,
    pub translation_feed_atom: Option<String>,
    pub translation_feed_rss: Option<String>,
}

impl EntityTypeSettings {
    /// Save-as for a direct template: the configured override, or
    /// `<template>.html`. None when the override is an empty string.
    pub fn direct_save_as(&self, template: &str) -> Option<String> {
        match self.direct_template_save_as.get(template) {
            Some(save_as) if save_as.is_empty() => None,
            Some(save_as) => Some(save_as.clone()),
            None => Some(format!("{}.html", template)),
        }
    }
}
