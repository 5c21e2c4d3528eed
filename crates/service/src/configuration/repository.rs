use async_trait::async_trait;

use super::domain::{ServiceDefinition, ServiceId, ServiceMacro};
use super::errors::ResolveError;

/// Read-only access to stored services, templates and their macros.
///
/// Every lookup except `find_service` fails with [`ResolveError::NotFound`]
/// when `id` is unknown.
#[async_trait]
pub trait ConfigurationRepository: Send + Sync {
    async fn find_service(&self, id: ServiceId) -> Result<Option<ServiceDefinition>, ResolveError>;
    async fn own_command_line(&self, id: ServiceId) -> Result<Option<String>, ResolveError>;
    async fn own_macros(&self, id: ServiceId) -> Result<Vec<ServiceMacro>, ResolveError>;
    async fn parent_id(&self, id: ServiceId) -> Result<Option<ServiceId>, ResolveError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::RwLock;

    #[derive(Debug, Clone)]
    struct Entry {
        definition: ServiceDefinition,
        command_line: Option<String>,
        macros: Vec<ServiceMacro>,
    }

    #[derive(Default)]
    pub struct InMemoryConfigurationRepository {
        entries: RwLock<HashMap<ServiceId, Entry>>,
        unavailable: AtomicBool,
        parent_lookups: AtomicUsize,
    }

    impl InMemoryConfigurationRepository {
        /// Register a service (or template) with its own command line and parent.
        pub fn with_service(self, id: ServiceId, command_line: Option<&str>, parent: Option<ServiceId>) -> Self {
            let definition = ServiceDefinition {
                id,
                description: format!("service-{id}"),
                alias: None,
                is_template: false,
                command_id: None,
                template_id: parent,
            };
            self.with_definition(definition, command_line)
        }

        pub fn with_definition(self, definition: ServiceDefinition, command_line: Option<&str>) -> Self {
            if let Ok(mut entries) = self.entries.write() {
                let macros = entries.remove(&definition.id).map(|e| e.macros).unwrap_or_default();
                entries.insert(
                    definition.id,
                    Entry { definition, command_line: command_line.map(str::to_string), macros },
                );
            }
            self
        }

        /// Declare a macro on an already registered owner.
        pub fn with_macro(self, owner: ServiceId, name: &str, value: &str) -> Self {
            self.with_service_macro(ServiceMacro::new(owner, name, value))
        }

        pub fn with_service_macro(self, m: ServiceMacro) -> Self {
            if let Ok(mut entries) = self.entries.write() {
                if let Some(entry) = entries.get_mut(&m.owner_id) {
                    entry.macros.push(m);
                }
            }
            self
        }

        /// Make every subsequent lookup fail with `StoreUnavailable`.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Number of `parent_id` calls served so far.
        pub fn parent_lookups(&self) -> usize {
            self.parent_lookups.load(Ordering::SeqCst)
        }

        fn entry(&self, id: ServiceId) -> Result<Option<Entry>, ResolveError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(ResolveError::StoreUnavailable("in-memory store switched off".into()));
            }
            let entries = self
                .entries
                .read()
                .map_err(|e| ResolveError::StoreUnavailable(e.to_string()))?;
            Ok(entries.get(&id).cloned())
        }

        fn existing(&self, id: ServiceId) -> Result<Entry, ResolveError> {
            self.entry(id)?.ok_or(ResolveError::NotFound(id))
        }
    }

    #[async_trait]
    impl ConfigurationRepository for InMemoryConfigurationRepository {
        async fn find_service(&self, id: ServiceId) -> Result<Option<ServiceDefinition>, ResolveError> {
            Ok(self.entry(id)?.map(|e| e.definition))
        }

        async fn own_command_line(&self, id: ServiceId) -> Result<Option<String>, ResolveError> {
            Ok(self.existing(id)?.command_line)
        }

        async fn own_macros(&self, id: ServiceId) -> Result<Vec<ServiceMacro>, ResolveError> {
            Ok(self.existing(id)?.macros)
        }

        async fn parent_id(&self, id: ServiceId) -> Result<Option<ServiceId>, ResolveError> {
            self.parent_lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.existing(id)?.definition.template_id)
        }
    }
}
