use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use log::debug;

use crate::config::{EntityTypeSettings, SiteConfig};
use crate::content::front_matter::{extract_front_matter, EntityFrontMatter};
use crate::content::model::Entity;
use crate::host::ContentReader;
use crate::utils::format_pattern;

type BoxResult<T> = Result<T, Box<dyn Error>>;

/// Default reader: YAML front matter over a markdown body.
#[derive(Debug, Clone, Default)]
pub struct FrontMatterReader;

impl FrontMatterReader {
    pub fn new() -> Self {
        FrontMatterReader
    }
}

impl ContentReader for FrontMatterReader {
    fn read_file(
        &self,
        base: &Path,
        path: &Path,
        settings: &EntityTypeSettings,
        site: &SiteConfig,
    ) -> BoxResult<Entity> {
        debug!("Reading entity source: {}", path.display());

        let raw = fs::read_to_string(path)?;
        let (front_matter, body) = extract_front_matter(&raw)?;

        check_mandatory_fields(&front_matter, &settings.mandatory, path)?;

        let title = front_matter.title.clone().unwrap_or_default();
        let slug = derive_slug(&front_matter, &title, path);
        let lang = front_matter
            .lang
            .clone()
            .unwrap_or_else(|| site.default_lang.clone());
        let date = front_matter.get_date();

        let translation_id = match site.translation_id.as_str() {
            "slug" => slug.clone(),
            field => front_matter
                .custom
                .get(field)
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| slug.clone()),
        };

        let mut vars = HashMap::new();
        vars.insert("slug", slug.clone());
        vars.insert("lang", lang.clone());
        vars.insert("type", settings.name.to_lowercase());

        let (url_pattern, save_as_pattern) = if lang == site.default_lang {
            (settings.url.as_str(), settings.save_as.as_str())
        } else {
            (settings.lang_url.as_str(), settings.lang_save_as.as_str())
        };

        let override_save_as = front_matter.save_as.is_some();
        let save_as = front_matter
            .save_as
            .clone()
            .unwrap_or_else(|| format_pattern(save_as_pattern, &vars, date.as_ref()));
        let url = front_matter
            .url
            .clone()
            .unwrap_or_else(|| format_pattern(url_pattern, &vars, date.as_ref()));

        let relative_path = path.strip_prefix(base).unwrap_or(path).to_path_buf();

        Ok(Entity {
            entity_type: settings.name.clone(),
            path: path.to_path_buf(),
            relative_path,
            title,
            slug,
            status: front_matter
                .status
                .clone()
                .unwrap_or_else(|| "published".to_string()),
            date,
            lang,
            translation_id,
            template: front_matter
                .template
                .clone()
                .unwrap_or_else(|| settings.default_template.clone()),
            url,
            save_as: PathBuf::from(save_as),
            override_save_as,
            category: front_matter.category.clone(),
            tags: front_matter.tags.clone().unwrap_or_default(),
            authors: front_matter.author_list(),
            summary: front_matter.summary.clone(),
            content: body,
            metadata: front_matter.custom,
        })
    }
}

/// Validate the configured mandatory fields against the front matter.
fn check_mandatory_fields(
    front_matter: &EntityFrontMatter,
    mandatory: &[String],
    path: &Path,
) -> BoxResult<()> {
    for field in mandatory {
        let present = match field.as_str() {
            "title" => front_matter.title.is_some(),
            "date" => front_matter.date.is_some(),
            "slug" => front_matter.slug.is_some(),
            "category" => front_matter.category.is_some(),
            "tags" => front_matter.tags.is_some(),
            "summary" => front_matter.summary.is_some(),
            "author" | "authors" => !front_matter.author_list().is_empty(),
            other => front_matter.custom.contains_key(other),
        };

        if !present {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Missing mandatory field '{}' in {}",
                    field,
                    path.display()
                ),
            )));
        }
    }
    Ok(())
}

fn derive_slug(front_matter: &EntityFrontMatter, title: &str, path: &Path) -> String {
    if let Some(slug) = &front_matter.slug {
        return slug.clone();
    }

    if !title.is_empty() {
        return slug::slugify(title);
    }

    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed".to_string())
}
