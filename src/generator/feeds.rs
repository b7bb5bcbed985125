use std::collections::BTreeMap;
use std::collections::HashMap;
use std::error::Error;

use crate::config::EntityTypeSettings;
use crate::content::model::{Entity, Term};
use crate::content::sorter::sort_entities;
use crate::host::{FeedKind, FeedRequest, OutputWriter};

type BoxResult<T> = Result<T, Box<dyn Error>>;

/// Write every configured feed for one entity type.
///
/// Plain feeds carry the canonical entities; "all" feeds add translations
/// and re-sort; taxonomy feeds substitute the term slug into the configured
/// path; translation feeds group canonical items and translations by
/// language.
pub fn generate_feeds(
    settings: &EntityTypeSettings,
    entities: &[Entity],
    translations: &[Entity],
    categories: &[(Term, Vec<Entity>)],
    authors: &[(Term, Vec<Entity>)],
    tags: &[(Term, Vec<Entity>)],
    writer: &mut dyn OutputWriter,
) -> BoxResult<()> {
    let canonical: Vec<&Entity> = entities.iter().collect();

    if let Some(path) = &settings.feed_atom {
        write_feed(writer, settings, &canonical, path, FeedKind::Atom)?;
    }
    if let Some(path) = &settings.feed_rss {
        write_feed(writer, settings, &canonical, path, FeedKind::Rss)?;
    }

    if settings.feed_all_atom.is_some() || settings.feed_all_rss.is_some() {
        let mut all: Vec<Entity> = entities.to_vec();
        all.extend_from_slice(translations);
        sort_entities(&mut all, &settings.sorter);
        let all_refs: Vec<&Entity> = all.iter().collect();

        if let Some(path) = &settings.feed_all_atom {
            write_feed(writer, settings, &all_refs, path, FeedKind::Atom)?;
        }
        if let Some(path) = &settings.feed_all_rss {
            write_feed(writer, settings, &all_refs, path, FeedKind::Rss)?;
        }
    }

    write_taxonomy_feeds(
        writer,
        settings,
        categories,
        &settings.category_feed_atom,
        &settings.category_feed_rss,
    )?;
    write_taxonomy_feeds(
        writer,
        settings,
        authors,
        &settings.author_feed_atom,
        &settings.author_feed_rss,
    )?;
    write_taxonomy_feeds(
        writer,
        settings,
        tags,
        &settings.tag_feed_atom,
        &settings.tag_feed_rss,
    )?;

    if settings.translation_feed_atom.is_some() || settings.translation_feed_rss.is_some() {
        let mut by_lang: BTreeMap<String, Vec<&Entity>> = BTreeMap::new();
        for entity in entities.iter().chain(translations.iter()) {
            by_lang.entry(entity.lang.clone()).or_default().push(entity);
        }

        for (lang, items) in by_lang {
            let mut vars = HashMap::new();
            vars.insert("lang", lang);

            if let Some(pattern) = &settings.translation_feed_atom {
                let path = crate::utils::format_pattern(pattern, &vars, None);
                write_feed(writer, settings, &items, &path, FeedKind::Atom)?;
            }
            if let Some(pattern) = &settings.translation_feed_rss {
                let path = crate::utils::format_pattern(pattern, &vars, None);
                write_feed(writer, settings, &items, &path, FeedKind::Rss)?;
            }
        }
    }

    Ok(())
}

fn write_taxonomy_feeds(
    writer: &mut dyn OutputWriter,
    settings: &EntityTypeSettings,
    buckets: &[(Term, Vec<Entity>)],
    atom_pattern: &Option<String>,
    rss_pattern: &Option<String>,
) -> BoxResult<()> {
    if atom_pattern.is_none() && rss_pattern.is_none() {
        return Ok(());
    }

    for (term, entities) in buckets {
        let mut vars = HashMap::new();
        vars.insert("slug", term.slug.clone());
        let refs: Vec<&Entity> = entities.iter().collect();

        if let Some(pattern) = atom_pattern {
            let path = crate::utils::format_pattern(pattern, &vars, None);
            write_feed(writer, settings, &refs, &path, FeedKind::Atom)?;
        }
        if let Some(pattern) = rss_pattern {
            let path = crate::utils::format_pattern(pattern, &vars, None);
            write_feed(writer, settings, &refs, &path, FeedKind::Rss)?;
        }
    }
    Ok(())
}

fn write_feed(
    writer: &mut dyn OutputWriter,
    settings: &EntityTypeSettings,
    entities: &[&Entity],
    path: &str,
    kind: FeedKind,
) -> BoxResult<()> {
    writer.write_feed(
        entities,
        &FeedRequest {
            path: path.to_string(),
            kind,
            entity_type: &settings.name,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_entity_settings, EntityTypeOverrides, SiteConfig};
    use crate::content::model::tests_support::entity_with_date;
    use crate::generator::tests_support::RecordingWriter;

    fn feed_settings() -> EntityTypeSettings {
        let overrides = EntityTypeOverrides {
            feed_atom: Some("feeds/project.atom.xml".to_string()),
            feed_all_rss: Some("feeds/project-all.rss.xml".to_string()),
            tag_feed_atom: Some("feeds/project.{slug}.atom.xml".to_string()),
            translation_feed_atom: Some("feeds/project.{lang}.atom.xml".to_string()),
            ..Default::default()
        };
        resolve_entity_settings("project", &SiteConfig::default(), &overrides)
    }

    #[test]
    fn test_feed_dispatch() {
        let entities = vec![
            entity_with_date("new", "2021-01-01"),
            entity_with_date("old", "2019-01-01"),
        ];
        let mut translation = entity_with_date("old-fr", "2020-01-01");
        translation.lang = "fr".to_string();
        let translations = vec![translation];

        let tag_term = Term::new("rust", "project/tag/{slug}.html", "project/tag/{slug}.html");
        let tags = vec![(tag_term, vec![entities[0].clone()])];

        let mut writer = RecordingWriter::default();
        generate_feeds(
            &feed_settings(),
            &entities,
            &translations,
            &[],
            &[],
            &tags,
            &mut writer,
        )
        .unwrap();

        let paths: Vec<&str> = writer.feeds.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "feeds/project.atom.xml",
                "feeds/project-all.rss.xml",
                "feeds/project.rust.atom.xml",
                "feeds/project.en.atom.xml",
                "feeds/project.fr.atom.xml",
            ]
        );

        // the "all" feed interleaves translations, re-sorted by date
        let all_feed = &writer.feeds[1];
        assert_eq!(all_feed.slugs, vec!["new", "old-fr", "old"]);
        assert_eq!(all_feed.kind, FeedKind::Rss);

        // language feeds split canonical items from translations
        assert_eq!(writer.feeds[3].slugs, vec!["new", "old"]);
        assert_eq!(writer.feeds[4].slugs, vec!["old-fr"]);
    }

    #[test]
    fn test_no_paths_no_feeds() {
        let settings = resolve_entity_settings(
            "project",
            &SiteConfig::default(),
            &EntityTypeOverrides::default(),
        );
        let mut writer = RecordingWriter::default();
        generate_feeds(
            &settings,
            &[entity_with_date("a", "2020-01-01")],
            &[],
            &[],
            &[],
            &[],
            &mut writer,
        )
        .unwrap();

        assert!(writer.feeds.is_empty());
    }
}
