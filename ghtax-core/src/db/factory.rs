//! Backend selection by name.
//!
//! | backend  | `connection_string`    |
//! |----------|------------------------|
//! | `memory` | ignored, `:memory:`    |

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::repository::{LedgerRepository, RepositoryError};

/// Which storage backend to open, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Name of a registered [`RepositoryFactory`].
    pub backend: String,
    /// Handed to the factory untouched.
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens one kind of [`LedgerRepository`].
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase name users pass as `--backend`.
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn LedgerRepository>, RepositoryError>;
}

/// Factories known to the application, looked up by [`DbConfig::backend`].
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: BTreeMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`. A later factory with the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Opens the backend named by `config.backend`.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] when no factory has that name.
    /// * Whatever the factory's own `create` returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn LedgerRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "no storage backend named '{}' (registered: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        factory.create(config).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::memory::{MemoryRepository, MemoryRepositoryFactory};

    /// Counts how often it was asked to open a repository.
    struct CountingFactory {
        name: &'static str,
        opened: Arc<AtomicUsize>,
    }

    impl CountingFactory {
        fn boxed(name: &'static str) -> (Box<dyn RepositoryFactory>, Arc<AtomicUsize>) {
            let opened = Arc::new(AtomicUsize::new(0));
            let factory = Self {
                name,
                opened: Arc::clone(&opened),
            };
            (Box::new(factory), opened)
        }
    }

    #[async_trait]
    impl RepositoryFactory for CountingFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn LedgerRepository>, RepositoryError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MemoryRepository::new()))
        }
    }

    struct BrokenFactory;

    #[async_trait]
    impl RepositoryFactory for BrokenFactory {
        fn backend_name(&self) -> &'static str {
            "broken"
        }

        async fn create(
            &self,
            config: &DbConfig,
        ) -> Result<Box<dyn LedgerRepository>, RepositoryError> {
            Err(RepositoryError::Storage(format!(
                "cannot open {}",
                config.connection_string
            )))
        }
    }

    fn config_for(backend: &str) -> DbConfig {
        DbConfig {
            backend: backend.to_string(),
            ..DbConfig::default()
        }
    }

    // =========================================================================
    // registration
    // =========================================================================

    #[test]
    fn default_config_selects_memory_backend() {
        assert_eq!(
            DbConfig::default(),
            DbConfig {
                backend: "memory".to_string(),
                connection_string: ":memory:".to_string(),
            }
        );
    }

    #[test]
    fn backends_are_listed_alphabetically() {
        let mut registry = RepositoryRegistry::new();
        assert!(registry.available_backends().is_empty());

        registry.register(CountingFactory::boxed("postgres").0);
        registry.register(Box::new(BrokenFactory));
        registry.register(Box::new(MemoryRepositoryFactory));

        assert_eq!(
            registry.available_backends(),
            vec!["broken", "memory", "postgres"]
        );
    }

    #[tokio::test]
    async fn re_registering_a_name_replaces_the_factory() {
        let mut registry = RepositoryRegistry::new();
        let (first, first_opened) = CountingFactory::boxed("memory");
        let (second, second_opened) = CountingFactory::boxed("memory");
        registry.register(first);
        registry.register(second);

        assert!(registry.create(&config_for("memory")).await.is_ok());

        assert_eq!(first_opened.load(Ordering::SeqCst), 0);
        assert_eq!(second_opened.load(Ordering::SeqCst), 1);
    }

    // =========================================================================
    // create
    // =========================================================================

    #[tokio::test]
    async fn create_opens_only_the_named_backend() {
        let mut registry = RepositoryRegistry::new();
        let (memory, memory_opened) = CountingFactory::boxed("memory");
        let (other, other_opened) = CountingFactory::boxed("other");
        registry.register(memory);
        registry.register(other);

        let repo = match registry.create(&config_for("memory")).await {
            Ok(repo) => repo,
            Err(err) => panic!("expected a repository, got {err:?}"),
        };

        assert!(repo.list_journal_entries(None).await.unwrap().is_empty());
        assert_eq!(memory_opened.load(Ordering::SeqCst), 1);
        assert_eq!(other_opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_backend_is_a_configuration_error() {
        let mut registry = RepositoryRegistry::new();
        registry.register(Box::new(MemoryRepositoryFactory));

        match registry.create(&config_for("sqlite")).await {
            Err(RepositoryError::Configuration(msg)) => {
                assert_eq!(msg, "no storage backend named 'sqlite' (registered: memory)");
            }
            Err(other) => panic!("expected Configuration error, got {other:?}"),
            Ok(_) => panic!("expected Configuration error, got a repository"),
        }
    }

    #[tokio::test]
    async fn factory_errors_pass_through() {
        let mut registry = RepositoryRegistry::new();
        registry.register(Box::new(BrokenFactory));

        match registry.create(&config_for("broken")).await {
            Err(RepositoryError::Storage(msg)) => assert_eq!(msg, "cannot open :memory:"),
            Err(other) => panic!("expected Storage error, got {other:?}"),
            Ok(_) => panic!("expected Storage error, got a repository"),
        }
    }
}
