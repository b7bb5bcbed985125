use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use log::{debug, error, warn};

use crate::cache::EntityCache;
use crate::config::{EntityTypeSettings, SiteConfig};
use crate::content::model::{Entity, Status, Term};
use crate::content::sorter::sort_entities;
use crate::content::translations::process_translations;
use crate::generator::{archives, feeds, GeneratorEnv, TypeContext};
use crate::host::{OutputWriter, PageKind, PageRequest};
use crate::signals::{Signal, SignalContext};
use crate::utils::page_name;

type BoxResult<T> = Result<T, Box<dyn Error>>;

/// The read/bucket/write cycle for one entity type
pub trait SubGenerator {
    fn entity_type(&self) -> &str;

    /// Read phase: discover, read, partition, translate, sort, bucket.
    fn generate_context(&mut self) -> BoxResult<()>;

    /// Write phase: dispatch one request per output artifact.
    fn generate_output(&self, writer: &mut dyn OutputWriter) -> BoxResult<()>;

    /// Canonical published entities.
    fn entities(&self) -> &[Entity];

    /// Snapshot of this type's results for templates.
    fn type_context(&self) -> TypeContext;
}

/// Standard sub-generator
pub struct EntitySubGenerator {
    settings: EntityTypeSettings,
    site: Arc<SiteConfig>,
    env: GeneratorEnv,

    entities: Vec<Entity>,
    translations: Vec<Entity>,
    drafts: Vec<Entity>,
    drafts_translations: Vec<Entity>,
    hidden: Vec<Entity>,
    hidden_translations: Vec<Entity>,

    tags: Vec<(Term, Vec<Entity>)>,
    categories: Vec<(Term, Vec<Entity>)>,
    authors: Vec<(Term, Vec<Entity>)>,

    failed_paths: Vec<PathBuf>,
}

impl EntitySubGenerator {
    pub fn new(
        settings: EntityTypeSettings,
        site: Arc<SiteConfig>,
        env: GeneratorEnv,
    ) -> Self {
        let subgen = EntitySubGenerator {
            settings,
            site,
            env,
            entities: Vec::new(),
            translations: Vec::new(),
            drafts: Vec::new(),
            drafts_translations: Vec::new(),
            hidden: Vec::new(),
            hidden_translations: Vec::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            authors: Vec::new(),
            failed_paths: Vec::new(),
        };

        subgen.env.signals.emit(
            Signal::SubGeneratorInit,
            &mut SignalContext::for_type(&subgen.settings.name),
        );
        subgen
    }

    pub fn settings(&self) -> &EntityTypeSettings {
        &self.settings
    }

    /// Source paths that failed to read, parse, or validate.
    pub fn failed_paths(&self) -> &[PathBuf] {
        &self.failed_paths
    }

    pub fn drafts(&self) -> &[Entity] {
        &self.drafts
    }

    pub fn tags(&self) -> &[(Term, Vec<Entity>)] {
        &self.tags
    }

    pub fn categories(&self) -> &[(Term, Vec<Entity>)] {
        &self.categories
    }

    pub fn authors(&self) -> &[(Term, Vec<Entity>)] {
        &self.authors
    }

    fn build_taxonomies(&mut self) {
        let mut tags: BTreeMap<String, Vec<Entity>> = BTreeMap::new();
        let mut categories: BTreeMap<String, Vec<Entity>> = BTreeMap::new();
        let mut authors: BTreeMap<String, Vec<Entity>> = BTreeMap::new();

        // Only canonical entities are listed, not translations
        for entity in &self.entities {
            if let Some(category) = &entity.category {
                categories
                    .entry(category.clone())
                    .or_default()
                    .push(entity.clone());
            }
            for tag in &entity.tags {
                tags.entry(tag.clone()).or_default().push(entity.clone());
            }
            for author in &entity.authors {
                authors
                    .entry(author.clone())
                    .or_default()
                    .push(entity.clone());
            }
        }

        self.tags = tags
            .into_iter()
            .map(|(name, entities)| {
                (
                    Term::new(&name, &self.settings.tag_url, &self.settings.tag_save_as),
                    entities,
                )
            })
            .collect();

        self.categories = categories
            .into_iter()
            .map(|(name, entities)| {
                (
                    Term::new(
                        &name,
                        &self.settings.category_url,
                        &self.settings.category_save_as,
                    ),
                    entities,
                )
            })
            .collect();
        if self.site.reverse_category_order {
            self.categories.reverse();
        }

        self.authors = authors
            .into_iter()
            .map(|(name, entities)| {
                (
                    Term::new(
                        &name,
                        &self.settings.author_url,
                        &self.settings.author_save_as,
                    ),
                    entities,
                )
            })
            .collect();
    }

    fn generate_entity_pages(&self, writer: &mut dyn OutputWriter) -> BoxResult<()> {
        for entity in self.translations.iter().chain(self.entities.iter()) {
            self.env.signals.emit(
                Signal::WriteEntity,
                &mut SignalContext::for_path(&self.settings.name, &entity.path),
            );
            writer.write_file(&self.entity_request(entity, PageKind::Entity))?;
        }
        Ok(())
    }

    fn generate_draft_pages(&self, writer: &mut dyn OutputWriter) -> BoxResult<()> {
        for draft in self.drafts_translations.iter().chain(self.drafts.iter()) {
            writer.write_file(&self.entity_request(draft, PageKind::Draft))?;
        }
        Ok(())
    }

    fn generate_hidden_pages(&self, writer: &mut dyn OutputWriter) -> BoxResult<()> {
        for entity in self
            .hidden_translations
            .iter()
            .chain(self.hidden.iter())
        {
            writer.write_file(&self.entity_request(entity, PageKind::Hidden))?;
        }
        Ok(())
    }

    fn entity_request<'a>(&'a self, entity: &'a Entity, kind: PageKind) -> PageRequest<'a> {
        PageRequest {
            save_as: entity.save_as.clone(),
            url: entity.url.clone(),
            template: entity.template.clone(),
            entity_type: &self.settings.name,
            kind,
            entity: Some(entity),
            term: None,
            entities: &[],
            all_entities: &self.entities,
            period: None,
            page_name: None,
            paginated: false,
            override_output: entity.override_save_as,
            relative_urls: self.site.relative_urls,
        }
    }

    fn generate_direct_templates(&self, writer: &mut dyn OutputWriter) -> BoxResult<()> {
        for template in &self.settings.direct_templates {
            let Some(save_as) = self.settings.direct_save_as(template) else {
                continue;
            };
            let paginated = self
                .settings
                .paginated_direct_templates
                .contains(template);

            writer.write_file(&PageRequest {
                save_as: PathBuf::from(&save_as),
                url: save_as.replace('\\', "/"),
                template: template.clone(),
                entity_type: &self.settings.name,
                kind: PageKind::Direct,
                entity: None,
                term: None,
                entities: if paginated { &self.entities } else { &[] },
                all_entities: &self.entities,
                period: None,
                page_name: Some(page_name(&save_as)),
                paginated,
                override_output: false,
                relative_urls: self.site.relative_urls,
            })?;
        }
        Ok(())
    }

    fn generate_taxonomy_pages(
        &self,
        writer: &mut dyn OutputWriter,
        kind: PageKind,
        template: &Option<String>,
        buckets: &[(Term, Vec<Entity>)],
    ) -> BoxResult<()> {
        let Some(template) = template else {
            return Ok(());
        };

        for (term, entities) in buckets {
            writer.write_file(&PageRequest {
                save_as: term.save_as.clone(),
                url: term.url.clone(),
                template: template.clone(),
                entity_type: &self.settings.name,
                kind,
                entity: None,
                term: Some(term),
                entities,
                all_entities: &self.entities,
                period: None,
                page_name: Some(term.page_name.clone()),
                paginated: true,
                override_output: false,
                relative_urls: self.site.relative_urls,
            })?;
        }
        Ok(())
    }

    fn generate_pages(&self, writer: &mut dyn OutputWriter) -> BoxResult<()> {
        // Top-level pages first, subfolders after, so the writer touches
        // the shallow paths before the taxonomy trees
        self.generate_entity_pages(writer)?;
        archives::generate_period_archives(
            &self.settings,
            &self.site,
            &self.entities,
            writer,
        )?;
        self.generate_direct_templates(writer)?;

        self.generate_taxonomy_pages(
            writer,
            PageKind::Tag,
            &self.settings.tag_template,
            &self.tags,
        )?;
        self.generate_taxonomy_pages(
            writer,
            PageKind::Category,
            &self.settings.category_template,
            &self.categories,
        )?;
        self.generate_taxonomy_pages(
            writer,
            PageKind::Author,
            &self.settings.author_template,
            &self.authors,
        )?;
        self.generate_draft_pages(writer)?;
        self.generate_hidden_pages(writer)?;
        Ok(())
    }
}

impl SubGenerator for EntitySubGenerator {
    fn entity_type(&self) -> &str {
        &self.settings.name
    }

    fn generate_context(&mut self) -> BoxResult<()> {
        let mut cache = self
            .site
            .cache_dir
            .as_ref()
            .map(|dir| EntityCache::load(dir, &self.settings.name));

        let files = self.env.source.get_files(
            &self.env.base_path,
            &self.settings.paths,
            &self.settings.excludes,
        )?;

        let mut all_published = Vec::new();
        let mut all_drafts = Vec::new();
        let mut all_hidden = Vec::new();

        for path in &files {
            self.env.signals.emit(
                Signal::PreRead,
                &mut SignalContext::for_path(&self.settings.name, path),
            );

            let cached = cache.as_ref().and_then(|cache| cache.get(path));
            let from_cache = cached.is_some();
            let entity = match cached {
                Some(entity) => entity,
                None => {
                    match self.env.reader.read_file(
                        &self.env.base_path,
                        path,
                        &self.settings,
                        &self.site,
                    ) {
                        Ok(entity) => entity,
                        Err(e) => {
                            if self.site.debug {
                                error!("Could not process {}\n{:?}", path.display(), e);
                            } else {
                                error!("Could not process {}: {}", path.display(), e);
                            }
                            self.failed_paths.push(path.clone());
                            continue;
                        }
                    }
                }
            };

            self.env.signals.emit(
                Signal::ReadContext,
                &mut SignalContext::for_path(&self.settings.name, path),
            );

            match entity.status() {
                Some(Status::Published) => {
                    if !from_cache {
                        if let Some(cache) = cache.as_mut() {
                            cache.put(path, entity.clone());
                        }
                    }
                    all_published.push(entity);
                }
                Some(Status::Draft) => all_drafts.push(entity),
                Some(Status::Hidden) => all_hidden.push(entity),
                None => {
                    warn!(
                        "Unknown status '{}' for file {}, skipping it.",
                        entity.status,
                        path.display()
                    );
                    self.failed_paths.push(path.clone());
                }
            }
        }

        let default_lang = self.site.default_lang.clone();
        let (entities, translations) = process_translations(all_published, &default_lang);
        self.entities = entities;
        self.translations = translations;

        let (drafts, drafts_translations) = process_translations(all_drafts, &default_lang);
        self.drafts = drafts;
        self.drafts_translations = drafts_translations;

        let (hidden, hidden_translations) = process_translations(all_hidden, &default_lang);
        self.hidden = hidden;
        self.hidden_translations = hidden_translations;

        sort_entities(&mut self.entities, &self.settings.sorter);

        self.env.signals.emit(
            Signal::PreTaxonomy,
            &mut SignalContext::for_type(&self.settings.name),
        );

        self.build_taxonomies();

        if let Some(mut cache) = cache {
            cache.prune(&files);
            if let Err(e) = cache.save() {
                warn!(
                    "Failed to save entity cache for '{}': {}",
                    self.settings.name, e
                );
            }
        }

        debug!(
            "Entity type '{}': {} entities, {} translations, {} drafts, {} hidden, {} failed",
            self.settings.name,
            self.entities.len(),
            self.translations.len(),
            self.drafts.len(),
            self.hidden.len(),
            self.failed_paths.len()
        );

        self.env.signals.emit(
            Signal::SubGeneratorFinalized,
            &mut SignalContext::for_type(&self.settings.name),
        );
        Ok(())
    }

    fn generate_output(&self, writer: &mut dyn OutputWriter) -> BoxResult<()> {
        feeds::generate_feeds(
            &self.settings,
            &self.entities,
            &self.translations,
            &self.categories,
            &self.authors,
            &self.tags,
            writer,
        )?;
        self.generate_pages(writer)?;

        self.env.signals.emit(
            Signal::SubGeneratorWriterFinalized,
            &mut SignalContext::for_type(&self.settings.name),
        );
        Ok(())
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn type_context(&self) -> TypeContext {
        TypeContext {
            name: self.settings.name.clone(),
            entities: self.entities.clone(),
            translations: self.translations.clone(),
            drafts: self.drafts.clone(),
            drafts_translations: self.drafts_translations.clone(),
            hidden: self.hidden.clone(),
            hidden_translations: self.hidden_translations.clone(),
            tags: self.tags.clone(),
            categories: self.categories.clone(),
            authors: self.authors.clone(),
        }
    }
}
