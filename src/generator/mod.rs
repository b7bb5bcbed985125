//! The entity generation pipeline.
//!
//! One sub-generator per declared entity type runs a read phase
//! (discover, parse, partition, translate, sort, bucket) and a write phase
//! (one request per output artifact). The aggregate generator drives both
//! phases, each exactly once, and merges the per-type results.

pub mod archives;
pub mod feeds;
pub mod registry;
pub mod subgen;

use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use log::{debug, error};

use crate::config::SiteConfig;
use crate::content::model::{Entity, Term};
use crate::host::{ContentReader, FrontMatterReader, OutputWriter, SourceFiles, WalkSource};
use crate::signals::{Signal, SignalContext, SignalRegistry};

pub use registry::{SubGeneratorFactory, SubGeneratorRegistry};
pub use subgen::{EntitySubGenerator, SubGenerator};

type BoxResult<T> = Result<T, Box<dyn Error>>;

/// Host collaborators shared by every sub-generator
#[derive(Clone)]
pub struct GeneratorEnv {
    /// Content base directory; source paths are relative to it
    pub base_path: PathBuf,

    pub source: Arc<dyn SourceFiles + Send + Sync>,
    pub reader: Arc<dyn ContentReader + Send + Sync>,
    pub signals: Arc<SignalRegistry>,
}

impl GeneratorEnv {
    /// Environment with the default discovery and reader implementations.
    pub fn new(base_path: PathBuf) -> Self {
        GeneratorEnv {
            base_path,
            source: Arc::new(WalkSource::new()),
            reader: Arc::new(FrontMatterReader::new()),
            signals: Arc::new(SignalRegistry::new()),
        }
    }

    pub fn with_signals(mut self, signals: Arc<SignalRegistry>) -> Self {
        self.signals = signals;
        self
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(std::env::temp_dir().join("entigen-tests"))
    }
}

/// One entity type's results, exposed to templates under the type name
#[derive(Debug, Clone, Default)]
pub struct TypeContext {
    pub name: String,
    pub entities: Vec<Entity>,
    pub translations: Vec<Entity>,
    pub drafts: Vec<Entity>,
    pub drafts_translations: Vec<Entity>,
    pub hidden: Vec<Entity>,
    pub hidden_translations: Vec<Entity>,
    pub tags: Vec<(Term, Vec<Entity>)>,
    pub categories: Vec<(Term, Vec<Entity>)>,
    pub authors: Vec<(Term, Vec<Entity>)>,
}

/// Aggregate generator over all declared entity types
pub struct EntityGenerator {
    env: GeneratorEnv,
    subgenerators: Vec<Box<dyn SubGenerator>>,
    entities: Vec<Entity>,
    contexts: HashMap<String, TypeContext>,
    context_generated: bool,
    output_generated: bool,
}

impl EntityGenerator {
    /// Build the generator with the standard sub-generator registry.
    pub fn new(site: SiteConfig, env: GeneratorEnv) -> BoxResult<Self> {
        Self::with_registry(site, env, &SubGeneratorRegistry::default())
    }

    /// Build the generator, resolving each type's sub-generator by name.
    pub fn with_registry(
        site: SiteConfig,
        env: GeneratorEnv,
        registry: &SubGeneratorRegistry,
    ) -> BoxResult<Self> {
        let site = Arc::new(site);
        let mut subgenerators: Vec<Box<dyn SubGenerator>> = Vec::new();

        for (entity_type, overrides) in &site.entity_types {
            debug!("Found entity type: {}", entity_type);
            let settings =
                crate::config::resolve_entity_settings(entity_type, &site, overrides);

            let subgenerator_name = settings.subgenerator.clone();
            let subgen = registry
                .create(&subgenerator_name, settings, site.clone(), env.clone())
                .ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!(
                            "Unknown sub-generator '{}' for entity type '{}'",
                            subgenerator_name, entity_type
                        ),
                    )
                })?;
            subgenerators.push(subgen);
        }

        env.signals
            .emit(Signal::GeneratorInit, &mut SignalContext::default());

        Ok(EntityGenerator {
            env,
            subgenerators,
            entities: Vec::new(),
            contexts: HashMap::new(),
            context_generated: false,
            output_generated: false,
        })
    }

    /// Run every sub-generator's read phase and merge the results.
    ///
    /// A failing entity type is logged and skipped; the others proceed.
    pub fn generate_context(&mut self) -> BoxResult<()> {
        if self.context_generated {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "generate_context may only run once per build",
            )));
        }
        self.context_generated = true;

        for subgen in &mut self.subgenerators {
            debug!(
                "Generating context for entities of type {}",
                subgen.entity_type()
            );
            if let Err(e) = subgen.generate_context() {
                error!(
                    "Entity type '{}' failed during context generation: {}",
                    subgen.entity_type(),
                    e
                );
                continue;
            }

            let context = subgen.type_context();
            self.entities.extend_from_slice(subgen.entities());
            self.contexts
                .insert(subgen.entity_type().to_lowercase(), context);
        }

        self.env
            .signals
            .emit(Signal::GeneratorFinalized, &mut SignalContext::default());
        Ok(())
    }

    /// Run every sub-generator's write phase.
    pub fn generate_output(&mut self, writer: &mut dyn OutputWriter) -> BoxResult<()> {
        if !self.context_generated {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "generate_output requires generate_context to have run",
            )));
        }
        if self.output_generated {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "generate_output may only run once per build",
            )));
        }
        self.output_generated = true;

        for subgen in &self.subgenerators {
            debug!(
                "Generating output for entities of type {}",
                subgen.entity_type()
            );
            if let Err(e) = subgen.generate_output(writer) {
                error!(
                    "Entity type '{}' failed during output generation: {}",
                    subgen.entity_type(),
                    e
                );
                continue;
            }
        }

        self.env
            .signals
            .emit(Signal::WriterFinalized, &mut SignalContext::default());
        Ok(())
    }

    /// Canonical published entities across all types.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// One type's results, keyed by lower-cased type name.
    pub fn type_context(&self, entity_type: &str) -> Option<&TypeContext> {
        self.contexts.get(&entity_type.to_lowercase())
    }

    /// All per-type results.
    pub fn type_contexts(&self) -> &HashMap<String, TypeContext> {
        &self.contexts
    }
}

#[cfg(test)]
pub mod tests_support {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use crate::config::{EntityTypeSettings, SiteConfig};
    use crate::content::model::Entity;
    use crate::host::{
        ContentReader, FeedKind, FeedRequest, OutputWriter, PageKind, PageRequest, Period,
        SourceFiles,
    };

    type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

    /// Owned snapshot of one write_file call
    #[derive(Debug)]
    pub struct WrittenPage {
        pub save_as: String,
        pub url: String,
        pub template: String,
        pub kind: PageKind,
        pub entity_slug: Option<String>,
        pub term: Option<String>,
        pub entity_slugs: Vec<String>,
        pub period: Option<Period>,
        pub page_name: Option<String>,
        pub paginated: bool,
    }

    /// Owned snapshot of one write_feed call
    #[derive(Debug)]
    pub struct WrittenFeed {
        pub path: String,
        pub kind: FeedKind,
        pub slugs: Vec<String>,
    }

    /// Writer that records requests instead of rendering them
    #[derive(Debug, Default)]
    pub struct RecordingWriter {
        pub pages: Vec<WrittenPage>,
        pub feeds: Vec<WrittenFeed>,
    }

    impl OutputWriter for RecordingWriter {
        fn write_file(&mut self, request: &PageRequest) -> BoxResult<()> {
            self.pages.push(WrittenPage {
                save_as: request.save_as.to_string_lossy().to_string(),
                url: request.url.clone(),
                template: request.template.clone(),
                kind: request.kind,
                entity_slug: request.entity.map(|e| e.slug.clone()),
                term: request.term.map(|t| t.name.clone()),
                entity_slugs: request.entities.iter().map(|e| e.slug.clone()).collect(),
                period: request.period.clone(),
                page_name: request.page_name.clone(),
                paginated: request.paginated,
            });
            Ok(())
        }

        fn write_feed(&mut self, entities: &[&Entity], request: &FeedRequest) -> BoxResult<()> {
            self.feeds.push(WrittenFeed {
                path: request.path.clone(),
                kind: request.kind,
                slugs: entities.iter().map(|e| e.slug.clone()).collect(),
            });
            Ok(())
        }
    }

    /// Source that serves a fixed file list
    pub struct MockSource {
        pub files: Vec<PathBuf>,
    }

    impl SourceFiles for MockSource {
        fn get_files(
            &self,
            _base: &Path,
            _paths: &[String],
            _excludes: &[String],
        ) -> BoxResult<Vec<PathBuf>> {
            Ok(self.files.clone())
        }
    }

    /// Reader that serves pre-built entities and fails on listed paths
    #[derive(Default)]
    pub struct MockReader {
        pub entities: HashMap<PathBuf, Entity>,
        pub failing: Vec<PathBuf>,
    }

    impl ContentReader for MockReader {
        fn read_file(
            &self,
            _base: &Path,
            path: &Path,
            _settings: &EntityTypeSettings,
            _site: &SiteConfig,
        ) -> BoxResult<Entity> {
            if self.failing.iter().any(|p| p == path) {
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("forced failure for {}", path.display()),
                )));
            }
            self.entities
                .get(path)
                .cloned()
                .ok_or_else(|| "no such fixture".into())
        }
    }
}
