//! Extension points fired at fixed pipeline stages.
//!
//! Other components register listeners and receive signals in registration
//! order; dispatch is sequential and synchronous.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use log::debug;

/// Pipeline stages observers can hook into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Aggregate generator constructed
    GeneratorInit,
    /// One sub-generator constructed
    SubGeneratorInit,
    /// Before a source file is read
    PreRead,
    /// After a source file was read into the context
    ReadContext,
    /// Before taxonomy bucketing, entities already sorted
    PreTaxonomy,
    /// One sub-generator finished its read phase
    SubGeneratorFinalized,
    /// Aggregate generator finished its read phase
    GeneratorFinalized,
    /// Before one entity page is written
    WriteEntity,
    /// One sub-generator finished writing
    SubGeneratorWriterFinalized,
    /// Aggregate generator finished writing
    WriterFinalized,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::GeneratorInit => "generator_init",
            Signal::SubGeneratorInit => "subgenerator_init",
            Signal::PreRead => "preread",
            Signal::ReadContext => "read_context",
            Signal::PreTaxonomy => "pretaxonomy",
            Signal::SubGeneratorFinalized => "subgenerator_finalized",
            Signal::GeneratorFinalized => "generator_finalized",
            Signal::WriteEntity => "write_entity",
            Signal::SubGeneratorWriterFinalized => "subgenerator_writer_finalized",
            Signal::WriterFinalized => "writer_finalized",
        }
    }
}

/// Context handed to listeners
#[derive(Debug, Default)]
pub struct SignalContext {
    /// Entity type the signal concerns, if any
    pub entity_type: Option<String>,

    /// Source path the signal concerns, if any
    pub path: Option<PathBuf>,

    /// Free-form data listeners may read or amend
    pub data: HashMap<String, serde_yaml::Value>,
}

impl SignalContext {
    pub fn for_type(entity_type: &str) -> Self {
        SignalContext {
            entity_type: Some(entity_type.to_string()),
            ..Default::default()
        }
    }

    pub fn for_path(entity_type: &str, path: &std::path::Path) -> Self {
        SignalContext {
            entity_type: Some(entity_type.to_string()),
            path: Some(path.to_path_buf()),
            ..Default::default()
        }
    }
}

/// A registered observer
pub trait SignalListener: Send + Sync {
    fn on_signal(&self, signal: Signal, context: &mut SignalContext);
}

/// Listener registry with deterministic dispatch order
#[derive(Default)]
pub struct SignalRegistry {
    listeners: Vec<(String, Arc<dyn SignalListener>)>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener under a name; listeners fire in registration
    /// order.
    pub fn register(&mut self, name: &str, listener: Arc<dyn SignalListener>) {
        debug!("Registering signal listener: {}", name);
        self.listeners.push((name.to_string(), listener));
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Dispatch a signal to every listener, sequentially.
    pub fn emit(&self, signal: Signal, context: &mut SignalContext) {
        for (name, listener) in &self.listeners {
            debug!("Signal {} -> {}", signal.name(), name);
            listener.on_signal(signal, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        label: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl SignalListener for Recorder {
        fn on_signal(&self, signal: Signal, context: &mut SignalContext) {
            self.seen.lock().unwrap().push(format!(
                "{}:{}:{}",
                self.label,
                signal.name(),
                context.entity_type.as_deref().unwrap_or("-")
            ));
        }
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SignalRegistry::new();
        registry.register(
            "first",
            Arc::new(Recorder {
                label: "a",
                seen: seen.clone(),
            }),
        );
        registry.register(
            "second",
            Arc::new(Recorder {
                label: "b",
                seen: seen.clone(),
            }),
        );

        let mut context = SignalContext::for_type("project");
        registry.emit(Signal::SubGeneratorInit, &mut context);
        registry.emit(Signal::SubGeneratorFinalized, &mut context);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                "a:subgenerator_init:project",
                "b:subgenerator_init:project",
                "a:subgenerator_finalized:project",
                "b:subgenerator_finalized:project",
            ]
        );
    }

    #[test]
    fn test_empty_registry_is_a_no_op() {
        let registry = SignalRegistry::new();
        assert!(registry.is_empty());
        registry.emit(Signal::GeneratorInit, &mut SignalContext::default());
    }
}
