//! In-process implementation of `NameRegistry`

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{Binding, NameRegistry};
use crate::error::RegistryError;

/// Registry backed by a map in the current process.
///
/// Used when the publisher and its callers share a process, and to host a
/// registry over gRPC via [`crate::server::make_naming_service`].
#[derive(Default)]
pub struct LocalNameRegistry {
    bindings: RwLock<BTreeMap<String, Binding>>,
}

impl LocalNameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Current binding for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.bindings.read().get(name).cloned()
    }

    fn validate(binding: &Binding) -> Result<(), RegistryError> {
        if binding.name.trim().is_empty() {
            return Err(RegistryError::Rejected(
                "binding name must not be empty".to_owned(),
            ));
        }
        if binding.endpoint.uri.is_empty() {
            return Err(RegistryError::Rejected(format!(
                "binding '{}' has no endpoint",
                binding.name
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl NameRegistry for LocalNameRegistry {
    async fn bind(&self, binding: Binding) -> Result<(), RegistryError> {
        Self::validate(&binding)?;
        let mut bindings = self.bindings.write();
        if bindings.contains_key(&binding.name) {
            return Err(RegistryError::AlreadyBound(binding.name));
        }
        tracing::debug!(name = %binding.name, uri = %binding.endpoint.uri, "bound");
        bindings.insert(binding.name.clone(), binding);
        Ok(())
    }

    async fn rebind(&self, binding: Binding) -> Result<(), RegistryError> {
        Self::validate(&binding)?;
        tracing::debug!(name = %binding.name, uri = %binding.endpoint.uri, "rebound");
        self.bindings.write().insert(binding.name.clone(), binding);
        Ok(())
    }

    async fn unbind(&self, name: &str) -> Result<(), RegistryError> {
        self.bindings
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotBound(name.to_owned()))
    }

    async fn lookup(&self, name: &str) -> Result<Binding, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::NotBound(name.to_owned()))
    }

    async fn list(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.bindings.read().keys().cloned().collect())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::api::ServiceEndpoint;

    fn binding(name: &str, port: u16) -> Binding {
        Binding::new(name, ServiceEndpoint::http("127.0.0.1", port), "test.v1.Svc")
    }

    #[tokio::test]
    async fn test_bind_then_lookup() {
        let registry = LocalNameRegistry::new();
        registry.bind(binding("Compute", 4000)).await.unwrap();

        let found = registry.lookup("Compute").await.unwrap();
        assert_eq!(found, binding("Compute", 4000));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_bind_rejects_taken_name() {
        let registry = LocalNameRegistry::new();
        registry.bind(binding("Compute", 4000)).await.unwrap();

        let err = registry.bind(binding("Compute", 4001)).await.unwrap_err();
        assert_eq!(err, RegistryError::AlreadyBound("Compute".to_owned()));

        // First binding is untouched
        assert_eq!(registry.get("Compute"), Some(binding("Compute", 4000)));
    }

    #[tokio::test]
    async fn test_rebind_replaces() {
        let registry = LocalNameRegistry::new();
        registry.bind(binding("Compute", 4000)).await.unwrap();
        registry.rebind(binding("Compute", 4001)).await.unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Compute"), Some(binding("Compute", 4001)));
    }

    #[tokio::test]
    async fn test_unbind() {
        let registry = LocalNameRegistry::new();
        registry.bind(binding("Compute", 4000)).await.unwrap();
        registry.unbind("Compute").await.unwrap();
        assert!(registry.is_empty());

        let err = registry.unbind("Compute").await.unwrap_err();
        assert_eq!(err, RegistryError::NotBound("Compute".to_owned()));
    }

    #[tokio::test]
    async fn test_lookup_missing() {
        let registry = LocalNameRegistry::new();
        let err = registry.lookup("Compute").await.unwrap_err();
        assert_eq!(err, RegistryError::NotBound("Compute".to_owned()));
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let registry = LocalNameRegistry::new();
        registry.bind(binding("b", 1)).await.unwrap();
        registry.bind(binding("a", 2)).await.unwrap();
        assert_eq!(registry.list().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let registry = LocalNameRegistry::new();
        let err = registry.bind(binding("  ", 4000)).await.unwrap_err();
        assert!(matches!(err, RegistryError::Rejected(_)));
        assert!(registry.is_empty());
    }
}
