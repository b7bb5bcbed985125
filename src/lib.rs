//! Entigen — pluggable entity content types for static site generators.
//!
//! A site declares any number of entity types ("projects", "events",
//! "recipes"); each type gets its own source paths, URL and save-as
//! patterns, taxonomies (tags, categories, authors), period archives,
//! direct templates and feeds. Entigen runs the whole content pipeline —
//! discovery, front-matter parsing, status partitioning, translation
//! grouping, sorting, taxonomy bucketing — and hands the host framework
//! one fully described write request per output artifact. Template
//! rendering, pagination and feed serialization stay on the host side,
//! behind the [`host::OutputWriter`] trait.
//!
//! Typical use:
//!
//! ```no_run
//! use entigen::config::{EntityTypeOverrides, SiteConfig};
//! use entigen::generator::{EntityGenerator, GeneratorEnv};
//! # struct MyWriter;
//! # impl entigen::host::OutputWriter for MyWriter {
//! #     fn write_file(&mut self, _: &entigen::host::PageRequest) -> Result<(), Box<dyn std::error::Error>> { Ok(()) }
//! #     fn write_feed(&mut self, _: &[&entigen::content::Entity], _: &entigen::host::FeedRequest) -> Result<(), Box<dyn std::error::Error>> { Ok(()) }
//! # }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut site = SiteConfig::default();
//!     site.entity_types
//!         .insert("project".to_string(), EntityTypeOverrides::default());
//!
//!     let env = GeneratorEnv::new("content".into());
//!     let mut generator = EntityGenerator::new(site, env)?;
//!     generator.generate_context()?;
//!
//!     let mut writer = MyWriter;
//!     generator.generate_output(&mut writer)?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod content;
pub mod generator;
pub mod host;
pub mod signals;
pub mod utils;

pub use config::{EntityTypeOverrides, EntityTypeSettings, SiteConfig};
pub use content::{Entity, Status, Term};
pub use generator::{EntityGenerator, EntitySubGenerator, GeneratorEnv, SubGenerator, SubGeneratorRegistry, TypeContext};
pub use host::{FeedKind, FeedRequest, OutputWriter, PageKind, PageRequest, Period};
pub use signals::{Signal, SignalContext, SignalListener, SignalRegistry};
