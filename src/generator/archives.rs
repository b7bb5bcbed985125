use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use chrono::{DateTime, Datelike, Utc};
use log::debug;

use crate::config::{EntityTypeSettings, SiteConfig};
use crate::content::model::Entity;
use crate::host::{OutputWriter, PageKind, PageRequest, Period};
use crate::utils::format_pattern;

type BoxResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Granularity {
    Year,
    Month,
    Day,
}

impl Granularity {
    fn key(&self, date: &DateTime<Utc>) -> (i32, u32, u32) {
        match self {
            Granularity::Year => (date.year(), 0, 0),
            Granularity::Month => (date.year(), date.month(), 0),
            Granularity::Day => (date.year(), date.month(), date.day()),
        }
    }

    fn period(&self, date: &DateTime<Utc>) -> Period {
        let month_name = date.format("%B").to_string();
        match self {
            Granularity::Year => Period::Year(date.year()),
            Granularity::Month => Period::Month(date.year(), month_name),
            Granularity::Day => Period::Day(date.year(), month_name, date.day()),
        }
    }
}

/// Write per-year, per-month, and per-day archive pages.
///
/// Entities are grouped by date components; each group's save path is
/// formatted from the date of its first item after sorting, so a
/// `{date:%d}` in a month pattern reflects that first item.
pub fn generate_period_archives(
    settings: &EntityTypeSettings,
    site: &SiteConfig,
    entities: &[Entity],
    writer: &mut dyn OutputWriter,
) -> BoxResult<()> {
    let Some(template) = &settings.archive_template else {
        return Ok(());
    };

    let periods = [
        (Granularity::Year, &settings.year_archive_save_as),
        (Granularity::Month, &settings.month_archive_save_as),
        (Granularity::Day, &settings.day_archive_save_as),
    ];

    // Dated entities only, ordered by date in the configured direction
    let mut dated: Vec<&Entity> = entities.iter().filter(|e| e.date.is_some()).collect();
    if dated.len() < entities.len() {
        debug!(
            "Entity type '{}': {} entities without a date left out of archives",
            settings.name,
            entities.len() - dated.len()
        );
    }
    dated.sort_by(|a, b| {
        if site.newest_first_archives {
            b.date.cmp(&a.date)
        } else {
            a.date.cmp(&b.date)
        }
    });

    for (granularity, save_as_pattern) in periods {
        let Some(save_as_pattern) = save_as_pattern else {
            continue;
        };

        for group in group_by_period(&dated, granularity) {
            // The first date stands in for the whole period in the
            // save-as pattern
            let date = group[0].date.unwrap_or_default();
            let save_as = format_pattern(save_as_pattern, &HashMap::new(), Some(&date));
            let group_entities: Vec<Entity> = group.iter().map(|e| (*e).clone()).collect();

            writer.write_file(&PageRequest {
                save_as: PathBuf::from(&save_as),
                url: save_as.replace('\\', "/"),
                template: template.clone(),
                entity_type: &settings.name,
                kind: PageKind::Archive,
                entity: None,
                term: None,
                entities: &group_entities,
                all_entities: entities,
                period: Some(granularity.period(&date)),
                page_name: None,
                paginated: false,
                override_output: false,
                relative_urls: site.relative_urls,
            })?;
        }
    }

    Ok(())
}

/// Group consecutive entities sharing a period key.
fn group_by_period<'a>(
    dated: &[&'a Entity],
    granularity: Granularity,
) -> Vec<Vec<&'a Entity>> {
    let mut groups: Vec<Vec<&'a Entity>> = Vec::new();
    let mut current_key = None;

    for entity in dated {
        let Some(date) = entity.date else { continue };
        let key = granularity.key(&date);

        if current_key != Some(key) {
            groups.push(Vec::new());
            current_key = Some(key);
        }
        if let Some(group) = groups.last_mut() {
            group.push(entity);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_entity_settings, EntityTypeOverrides};
    use crate::content::model::tests_support::entity_with_date;
    use crate::generator::tests_support::RecordingWriter;

    fn archive_settings() -> EntityTypeSettings {
        let overrides = EntityTypeOverrides {
            archive_template: Some("archive".to_string()),
            year_archive_save_as: Some("project/{date:%Y}/index.html".to_string()),
            month_archive_save_as: Some("project/{date:%Y}/{date:%m}/index.html".to_string()),
            day_archive_save_as: Some(
                "project/{date:%Y}/{date:%m}/{date:%d}/index.html".to_string(),
            ),
            ..Default::default()
        };
        resolve_entity_settings("project", &SiteConfig::default(), &overrides)
    }

    #[test]
    fn test_groups_cover_each_period_once() {
        let entities = vec![
            entity_with_date("a", "2020-01-01"),
            entity_with_date("b", "2020-01-15"),
            entity_with_date("c", "2020-03-07"),
            entity_with_date("d", "2021-01-01"),
        ];

        let mut writer = RecordingWriter::default();
        generate_period_archives(
            &archive_settings(),
            &SiteConfig::default(),
            &entities,
            &mut writer,
        )
        .unwrap();

        let year_pages: Vec<&str> = writer
            .pages
            .iter()
            .filter(|p| matches!(p.period, Some(Period::Year(_))))
            .map(|p| p.save_as.as_str())
            .collect();
        assert_eq!(
            year_pages,
            vec!["project/2021/index.html", "project/2020/index.html"]
        );

        // 2 years + 3 months + 4 days
        assert_eq!(writer.pages.len(), 9);
    }

    #[test]
    fn test_representative_date_is_first_sorted_item() {
        let entities = vec![
            entity_with_date("a", "2020-01-01"),
            entity_with_date("b", "2020-01-15"),
        ];

        let mut settings = archive_settings();
        settings.month_archive_save_as =
            Some("project/{date:%Y}/{date:%m}/{date:%d}.html".to_string());
        settings.year_archive_save_as = None;
        settings.day_archive_save_as = None;

        let mut writer = RecordingWriter::default();
        generate_period_archives(
            &settings,
            &SiteConfig::default(),
            &entities,
            &mut writer,
        )
        .unwrap();

        // Newest first: the group's first item is the Jan 15 entity
        assert_eq!(writer.pages[0].save_as, "project/2020/01/15.html");
        assert_eq!(
            writer.pages[0].period,
            Some(Period::Month(2020, "January".to_string()))
        );
    }

    #[test]
    fn test_oldest_first_changes_representative() {
        let entities = vec![
            entity_with_date("a", "2020-01-01"),
            entity_with_date("b", "2020-01-15"),
        ];

        let mut settings = archive_settings();
        settings.month_archive_save_as =
            Some("project/{date:%Y}/{date:%m}/{date:%d}.html".to_string());
        settings.year_archive_save_as = None;
        settings.day_archive_save_as = None;

        let mut site = SiteConfig::default();
        site.newest_first_archives = false;

        let mut writer = RecordingWriter::default();
        generate_period_archives(&settings, &site, &entities, &mut writer).unwrap();

        assert_eq!(writer.pages[0].save_as, "project/2020/01/01.html");
    }

    #[test]
    fn test_no_template_means_no_archives() {
        let mut settings = archive_settings();
        settings.archive_template = None;

        let mut writer = RecordingWriter::default();
        generate_period_archives(
            &settings,
            &SiteConfig::default(),
            &[entity_with_date("a", "2020-01-01")],
            &mut writer,
        )
        .unwrap();

        assert!(writer.pages.is_empty());
    }
}
