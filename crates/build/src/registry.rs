//! Environment routing for build dispatch.
//!
//! Adding a backend environment is additive: register a factory under the
//! environment's name instead of extending a central conditional. Names not
//! present in the registry are rejected before any artifact is touched.

use std::collections::HashMap;
use std::sync::Arc;

use kiln_schema::{ExecutionEnvironment, LOCAL_ENVIRONMENT, LocalBuildOptions};

use crate::backend::BuildOptions;
use crate::environment::adapt_properties;
use crate::error::BuildError;
use crate::external::{ClusterContextProvider, DelegatedBuilder, LocalBuilderFactory};

/// Creates the delegated builder bound to one execution environment.
pub trait EnvironmentFactory: Send + Sync {
  fn new_builder(
    &self,
    env: &ExecutionEnvironment,
    opts: &BuildOptions,
  ) -> crate::Result<Box<dyn DelegatedBuilder>>;
}

/// Maps execution-environment names to builder factories.
pub struct EnvironmentRegistry {
  factories: HashMap<String, Arc<dyn EnvironmentFactory>>,
}

impl EnvironmentRegistry {
  /// An empty registry. Every environment is rejected until factories are
  /// registered.
  pub fn new() -> Self {
    Self {
      factories: HashMap::new(),
    }
  }

  /// The default registry: the `"local"` environment backed by the given
  /// collaborators.
  pub fn local(
    factory: Arc<dyn LocalBuilderFactory>,
    cluster: Arc<dyn ClusterContextProvider>,
  ) -> Self {
    let mut registry = Self::new();
    registry.register(LOCAL_ENVIRONMENT, Arc::new(LocalEnvironment::new(factory, cluster)));
    registry
  }

  /// Bind an environment name to a factory, replacing any previous binding.
  pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn EnvironmentFactory>) {
    self.factories.insert(name.into(), factory);
  }

  /// Look up the factory for an environment, rejecting unmapped names.
  pub fn resolve(&self, name: &str, backend: &'static str) -> crate::Result<&dyn EnvironmentFactory> {
    self
      .factories
      .get(name)
      .map(Arc::as_ref)
      .ok_or_else(|| BuildError::UnsupportedEnvironment {
        environment: name.to_string(),
        backend,
      })
  }

  /// Environment names with a registered factory.
  pub fn environments(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }
}

impl Default for EnvironmentRegistry {
  fn default() -> Self {
    Self::new()
  }
}

/// Factory for the local execution environment.
///
/// Adapts the environment's generic properties into [`LocalBuildOptions`],
/// discovers the active cluster context, and hands both to the local
/// builder factory collaborator.
pub struct LocalEnvironment {
  factory: Arc<dyn LocalBuilderFactory>,
  cluster: Arc<dyn ClusterContextProvider>,
}

impl LocalEnvironment {
  pub fn new(factory: Arc<dyn LocalBuilderFactory>, cluster: Arc<dyn ClusterContextProvider>) -> Self {
    Self { factory, cluster }
  }
}

impl EnvironmentFactory for LocalEnvironment {
  fn new_builder(
    &self,
    env: &ExecutionEnvironment,
    opts: &BuildOptions,
  ) -> crate::Result<Box<dyn DelegatedBuilder>> {
    let options: LocalBuildOptions = adapt_properties(env)?;
    let cluster_context = self
      .cluster
      .current_context()
      .map_err(|source| BuildError::ClusterContext { source })?;
    self
      .factory
      .new_builder(options, &cluster_context, opts.skip_tests)
      .map_err(|source| BuildError::BuilderInit {
        environment: env.name.clone(),
        source,
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_registry_rejects_everything() {
    let registry = EnvironmentRegistry::new();
    let err = match registry.resolve("local", "bazel") {
      Ok(_) => panic!("empty registry resolved an environment"),
      Err(err) => err,
    };
    assert!(matches!(err, BuildError::UnsupportedEnvironment { .. }));
    assert!(err.to_string().contains("local"));
    assert!(err.to_string().contains("bazel"));
  }

  #[test]
  fn registered_names_resolve() {
    struct Nope;
    impl EnvironmentFactory for Nope {
      fn new_builder(
        &self,
        env: &ExecutionEnvironment,
        _opts: &BuildOptions,
      ) -> crate::Result<Box<dyn DelegatedBuilder>> {
        Err(BuildError::BuilderInit {
          environment: env.name.clone(),
          source: anyhow::anyhow!("unused"),
        })
      }
    }

    let mut registry = EnvironmentRegistry::new();
    registry.register("staging", Arc::new(Nope));
    assert!(registry.resolve("staging", "docker").is_ok());
    assert!(registry.resolve("production", "docker").is_err());
    assert_eq!(registry.environments().collect::<Vec<_>>(), vec!["staging"]);
  }
}
