use std::collections::HashMap;
use std::sync::Arc;
use log::debug;

use crate::config::defaults::STANDARD_SUBGENERATOR;
use crate::config::{EntityTypeSettings, SiteConfig};
use crate::generator::subgen::{EntitySubGenerator, SubGenerator};
use crate::generator::GeneratorEnv;

/// Builds a sub-generator for one entity type
pub type SubGeneratorFactory =
    fn(EntityTypeSettings, Arc<SiteConfig>, GeneratorEnv) -> Box<dyn SubGenerator>;

/// Registry of sub-generator implementations keyed by name.
///
/// The per-type `subgenerator` setting selects an implementation by string;
/// unknown names fail at generator construction.
pub struct SubGeneratorRegistry {
    factories: HashMap<String, SubGeneratorFactory>,
}

impl Default for SubGeneratorRegistry {
    fn default() -> Self {
        let mut registry = SubGeneratorRegistry {
            factories: HashMap::new(),
        };
        registry
            .register(STANDARD_SUBGENERATOR, |settings, site, env| {
                Box::new(EntitySubGenerator::new(settings, site, env))
            })
            .ok();
        registry
    }
}

impl SubGeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a name.
    pub fn register(&mut self, name: &str, factory: SubGeneratorFactory) -> Result<(), String> {
        if self.factories.contains_key(name) {
            return Err(format!("Sub-generator '{}' is already registered", name));
        }

        debug!("Registering sub-generator: {}", name);
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Instantiate the named sub-generator for an entity type.
    pub fn create(
        &self,
        name: &str,
        settings: EntityTypeSettings,
        site: Arc<SiteConfig>,
        env: GeneratorEnv,
    ) -> Option<Box<dyn SubGenerator>> {
        let factory = self.factories.get(name)?;
        Some(factory(settings, site, env))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_entity_settings;
    use crate::config::EntityTypeOverrides;

    #[test]
    fn test_standard_is_registered() {
        let registry = SubGeneratorRegistry::new();
        assert!(registry.contains(STANDARD_SUBGENERATOR));
        assert!(!registry.contains("exotic"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = SubGeneratorRegistry::new();
        let result = registry.register(STANDARD_SUBGENERATOR, |settings, site, env| {
            Box::new(EntitySubGenerator::new(settings, site, env))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_create_standard() {
        let registry = SubGeneratorRegistry::new();
        let site = Arc::new(SiteConfig::default());
        let settings =
            resolve_entity_settings("project", &site, &EntityTypeOverrides::default());

        let subgen = registry.create(
            STANDARD_SUBGENERATOR,
            settings,
            site,
            GeneratorEnv::for_tests(),
        );
        assert!(subgen.is_some());
        assert_eq!(subgen.unwrap().entity_type(), "project");
    }
}
