use log::warn;

use crate::config::defaults;
use crate::config::types::{EntityTypeOverrides, EntityTypeSettings, SiteConfig};

/// Resolve the settings for one entity type.
///
/// Merge order, increasing precedence: built-in defaults derived from the
/// type name, the site-wide `entity_defaults` overlay, then the type's own
/// overrides.
pub fn resolve_entity_settings(
    entity_type: &str,
    site: &SiteConfig,
    overrides: &EntityTypeOverrides,
) -> EntityTypeSettings {
    let mut settings = defaults::entity_type_defaults(entity_type);
    apply_overrides(&mut settings, &site.entity_defaults);
    apply_overrides(&mut settings, overrides);
    validate(&mut settings);
    settings
}

fn apply_overrides(settings: &mut EntityTypeSettings, overrides: &EntityTypeOverrides) {
    macro_rules! take {
        ($field:ident) => {
            if let Some(value) = &overrides.$field {
                settings.$field = value.clone();
            }
        };
    }
    macro_rules! take_opt {
        ($field:ident) => {
            if overrides.$field.is_some() {
                settings.$field = overrides.$field.clone();
            }
        };
    }

    take!(paths);
    take!(excludes);
    take!(mandatory);
    take!(default_template);
    take!(subgenerator);
    take!(sorter);

    take!(url);
    take!(save_as);
    take!(lang_url);
    take!(lang_save_as);
    take!(category_url);
    take!(category_save_as);
    take!(tag_url);
    take!(tag_save_as);
    take!(author_url);
    take!(author_save_as);

    take_opt!(archive_template);
    take_opt!(category_template);
    take_opt!(tag_template);
    take_opt!(author_template);
    take_opt!(year_archive_save_as);
    take_opt!(month_archive_save_as);
    take_opt!(day_archive_save_as);

    take!(direct_templates);
    take!(paginated_direct_templates);
    take!(direct_template_save_as);

    take_opt!(feed_atom);
    take_opt!(feed_rss);
    take_opt!(feed_all_atom);
    take_opt!(feed_all_rss);
    take_opt!(category_feed_atom);
    take_opt!(category_feed_rss);
    take_opt!(author_feed_atom);
    take_opt!(author_feed_rss);
    take_opt!(tag_feed_atom);
    take_opt!(tag_feed_rss);
    take_opt!(translation_feed_atom);
    take_opt!(translation_feed_rss);
}

fn validate(settings: &mut EntityTypeSettings) {
    // title is non-negotiable
    if !settings.mandatory.iter().any(|f| f == "title") {
        settings.mandatory.insert(0, "title".to_string());
    }

    if settings.paths.is_empty() {
        warn!(
            "Entity type '{}' has no source paths; falling back to '{}'",
            settings.name,
            settings.name.to_lowercase()
        );
        settings.paths = vec![settings.name.to_lowercase()];
    }

    if settings.sorter.fields.is_empty() {
        warn!(
            "Entity type '{}' has an empty sorter; using the default",
            settings.name
        );
        settings.sorter = Default::default();
    }

    for template in &settings.paginated_direct_templates {
        if !settings.direct_templates.contains(template) {
            warn!(
                "Entity type '{}': paginated template '{}' is not in direct_templates",
                settings.name, template
            );
        }
    }
}
