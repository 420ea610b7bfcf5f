//! Method registry and call stubs.
//!
//! The registry maps `namespace → method → dotted name` and is rebuilt from
//! scratch on every introspection. Stubs ([`Namespace`], [`Method`]) are
//! created on lookup and capture the dotted name, so replacing the registry
//! never changes what an existing stub sends.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::protocol::MethodName;

use super::args::CallArgs;
use super::core::Reply;
use super::dispatch::Callbacks;
use super::RpcClient;

// ============================================================================
// MethodRegistry
// ============================================================================

/// Snapshot of the server's method surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodRegistry {
    namespaces: FxHashMap<String, FxHashMap<String, MethodName>>,
}

impl MethodRegistry {
    /// Builds a registry from an introspection list.
    ///
    /// Malformed names are skipped.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut namespaces: FxHashMap<String, FxHashMap<String, MethodName>> =
            FxHashMap::default();

        for name in names {
            let name = name.as_ref();
            match MethodName::parse(name) {
                Ok(parsed) => {
                    namespaces
                        .entry(parsed.namespace().to_string())
                        .or_default()
                        .insert(parsed.method().to_string(), parsed);
                }
                Err(_) => warn!(name, "Skipping malformed method name"),
            }
        }

        Self { namespaces }
    }

    /// Looks up a dotted name.
    #[must_use]
    pub fn get(&self, namespace: &str, method: &str) -> Option<&MethodName> {
        self.namespaces.get(namespace)?.get(method)
    }

    /// Returns `true` if `full` (dotted) is registered.
    #[must_use]
    pub fn contains(&self, full: &str) -> bool {
        MethodName::parse(full)
            .ok()
            .is_some_and(|n| self.get(n.namespace(), n.method()).is_some())
    }

    /// Returns `true` if `namespace` has at least one method.
    #[inline]
    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Returns the sorted namespace names.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.namespaces.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the sorted method names of `namespace`.
    #[must_use]
    pub fn methods_of(&self, namespace: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .namespaces
            .get(namespace)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Returns every dotted name, sorted.
    #[must_use]
    pub fn all(&self) -> Vec<&MethodName> {
        let mut all: Vec<&MethodName> = self.namespaces.values().flat_map(|m| m.values()).collect();
        all.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
        all
    }

    /// Returns the number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.values().map(FxHashMap::len).sum()
    }

    /// Returns `true` if no method is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

// ============================================================================
// Namespace
// ============================================================================

/// Stub for one namespace (e.g. `core`).
#[derive(Clone)]
pub struct Namespace {
    client: RpcClient,
    name: String,
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Namespace {
    pub(crate) fn new(client: RpcClient, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    /// Returns the namespace name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stub for `method` in this namespace.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] before introspection completed
    /// - [`Error::MethodNotFound`] if the server does not expose it
    pub fn method(&self, method: &str) -> Result<Method> {
        let registry = self.client.registry()?;
        let name = registry
            .get(&self.name, method)
            .cloned()
            .ok_or_else(|| Error::method_not_found(format!("{}.{method}", self.name)))?;
        Ok(Method::new(self.client.clone(), name))
    }

    /// Returns the method names currently exposed in this namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] before introspection completed.
    pub fn methods(&self) -> Result<Vec<String>> {
        let registry = self.client.registry()?;
        Ok(registry
            .methods_of(&self.name)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

// ============================================================================
// Method
// ============================================================================

/// Stub for one remote method.
///
/// Always sends the dotted name it was created with.
#[derive(Clone)]
pub struct Method {
    client: RpcClient,
    name: MethodName,
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name.as_str())
            .finish_non_exhaustive()
    }
}

impl Method {
    pub(crate) fn new(client: RpcClient, name: MethodName) -> Self {
        Self { client, name }
    }

    /// Returns the dotted name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &MethodName {
        &self.name
    }

    /// Calls the method with positional `params`.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn call(&self, params: Vec<Value>) -> Result<Reply> {
        self.client.execute(self.name.as_str(), params).await
    }

    /// Calls the method and decodes the result into `T`.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn call_as<T: DeserializeOwned>(&self, params: Vec<Value>) -> Result<T> {
        self.client.call_as(self.name.as_str(), params).await
    }

    /// Calls the method with an untyped argument list.
    ///
    /// A trailing options bag is stripped according to [`CallArgs::parse`];
    /// the remaining arguments become the params.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn call_args(&self, args: Vec<Value>) -> Result<Reply> {
        let args = CallArgs::parse(args);
        self.client.execute(self.name.as_str(), args.params).await
    }

    /// Calls the method in the background and reports through `callbacks`.
    ///
    /// See [`RpcClient::dispatch`].
    pub fn dispatch(&self, params: Vec<Value>, callbacks: Callbacks) -> tokio::task::JoinHandle<()> {
        self.client.dispatch(self.name.as_str(), params, callbacks)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names_groups_by_namespace() {
        let registry = MethodRegistry::from_names(["core.add", "core.remove", "web.update"]);

        assert_eq!(registry.namespaces(), vec!["core", "web"]);
        assert_eq!(registry.methods_of("core"), vec!["add", "remove"]);
        assert_eq!(registry.methods_of("web"), vec!["update"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_no_cross_namespace_leakage() {
        let registry = MethodRegistry::from_names(["core.add", "core.remove", "web.update"]);

        assert!(registry.contains("core.add"));
        assert!(registry.contains("web.update"));
        assert!(!registry.contains("core.update"));
        assert!(!registry.contains("web.add"));
    }

    #[test]
    fn test_stub_keeps_full_dotted_name() {
        let registry = MethodRegistry::from_names(["web.get.thing"]);
        let name = registry.get("web", "get.thing").expect("registered");
        assert_eq!(name.as_str(), "web.get.thing");
    }

    #[test]
    fn test_malformed_names_are_skipped() {
        let registry = MethodRegistry::from_names(["nodot", "core.add", ".x"]);
        assert_eq!(registry.len(), 1);
        assert!(!registry.has_namespace("nodot"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = MethodRegistry::from_names(Vec::<String>::new());
        assert!(registry.is_empty());
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_all_sorted() {
        let registry = MethodRegistry::from_names(["web.b", "core.a", "auth.login"]);
        let all: Vec<&str> = registry.all().into_iter().map(MethodName::as_str).collect();
        assert_eq!(all, vec!["auth.login", "core.a", "web.b"]);
    }
}
