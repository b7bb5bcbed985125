//! Interfaces to the host framework.
//!
//! The generator never renders templates, paginates, or serializes feed
//! XML itself; it hands fully described write requests to the host through
//! these traits. Default implementations are provided for the mechanical
//! pieces (file discovery, front-matter reading) so a pipeline can run
//! end-to-end without a full host.

pub mod reader;
pub mod source;

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::config::{EntityTypeSettings, SiteConfig};
use crate::content::model::{Entity, Term};

pub use reader::FrontMatterReader;
pub use source::WalkSource;

type BoxResult<T> = Result<T, Box<dyn Error>>;

/// What a page write request describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Entity,
    Draft,
    Hidden,
    Archive,
    Direct,
    Tag,
    Category,
    Author,
}

/// Archive period attached to an archive page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    Year(i32),
    /// Year and month name
    Month(i32, String),
    /// Year, month name, and day
    Day(i32, String, u32),
}

/// Feed flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Atom,
    Rss,
}

/// One page to be rendered and written by the host
#[derive(Debug)]
pub struct PageRequest<'a> {
    /// Output path
    pub save_as: PathBuf,

    /// URL of the page
    pub url: String,

    /// Template name for the host's template lookup
    pub template: String,

    /// Entity type this page belongs to
    pub entity_type: &'a str,

    pub kind: PageKind,

    /// The entity being written, for entity/draft/hidden pages
    pub entity: Option<&'a Entity>,

    /// The taxonomy term, for tag/category/author pages
    pub term: Option<&'a Term>,

    /// Entity subset for this page (bucket, archive group, paginated set)
    pub entities: &'a [Entity],

    /// All canonical published entities of the type
    pub all_entities: &'a [Entity],

    /// Archive period, for archive pages
    pub period: Option<Period>,

    /// Page name (save-as without extension) for templates
    pub page_name: Option<String>,

    /// Whether the host should paginate `entities`
    pub paginated: bool,

    /// The save-as path came from front matter and must win over any
    /// host-side path rules
    pub override_output: bool,

    /// Render URLs relative to this page
    pub relative_urls: bool,
}

/// One feed to be serialized and written by the host
#[derive(Debug)]
pub struct FeedRequest<'a> {
    /// Feed path, placeholders already substituted
    pub path: String,

    pub kind: FeedKind,

    /// Entity type the feed belongs to
    pub entity_type: &'a str,
}

/// Host-side file writing: template rendering, pagination, feed XML.
pub trait OutputWriter {
    fn write_file(&mut self, request: &PageRequest) -> BoxResult<()>;

    fn write_feed(&mut self, entities: &[&Entity], request: &FeedRequest) -> BoxResult<()>;
}

/// Content file discovery under the configured source paths.
pub trait SourceFiles {
    fn get_files(
        &self,
        base: &Path,
        paths: &[String],
        excludes: &[String],
    ) -> BoxResult<Vec<PathBuf>>;
}

/// Reading and parsing one source file into a validated entity.
pub trait ContentReader {
    fn read_file(
        &self,
        base: &Path,
        path: &Path,
        settings: &EntityTypeSettings,
        site: &SiteConfig,
    ) -> BoxResult<Entity>;
}
