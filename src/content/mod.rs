pub mod front_matter;
pub mod model;
pub mod sorter;
pub mod translations;

pub use front_matter::{extract_front_matter, has_front_matter, EntityFrontMatter};
pub use model::{Entity, Status, Term};
pub use sorter::{sort_entities, SortSpec};
pub use translations::process_translations;
