pub mod defaults;
pub mod resolve;
pub mod types;

pub use resolve::resolve_entity_settings;
pub use types::{EntityTypeOverrides, EntityTypeSettings, SiteConfig};
