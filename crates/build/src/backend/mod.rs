//! Backend builders exposed to the orchestrator.
//!
//! Each builder owns one artifact flavor (bazel targets, Dockerfiles) and
//! routes build requests to the delegated builder bound to the requested
//! execution environment. Dependency resolution is independent of the build
//! path and is typically driven per artifact by a watcher.

mod bazel;
mod docker;
mod gcb;

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

pub use bazel::BazelBuilder;
pub use docker::DockerBuilder;
pub use gcb::{CLOUD_BUILD_RETRY_DELAY, CloudBuilder, status};

use kiln_schema::{Artifact, BuildResult, ExecutionEnvironment, ImageTags};

use crate::error::BuildError;
use crate::materialize::materialize;
use crate::registry::EnvironmentRegistry;

/// Orchestrator-level options shared by every builder.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  /// Skip backend test targets during the build.
  pub skip_tests: bool,
}

/// Common surface every backend builder exposes to the orchestrator.
#[async_trait]
pub trait ArtifactBuilder: Send + Sync {
  /// Static identity labels for observability, e.g. `{"builder": "bazel"}`.
  fn labels(&self) -> HashMap<String, String>;

  /// The source files the artifact's build depends on, as absolute paths.
  ///
  /// Materializes the artifact's configuration if it has not been already.
  async fn dependencies(&self, artifact: &mut Artifact) -> crate::Result<Vec<PathBuf>>;

  /// Build every artifact in the batch in the configured environment,
  /// writing build logs to `out`.
  ///
  /// All-or-nothing: if any artifact's configuration fails to materialize,
  /// no build is attempted and no results are returned.
  async fn build(
    &self,
    out: &mut (dyn Write + Send),
    tags: &ImageTags,
    artifacts: &mut [Artifact],
  ) -> crate::Result<Vec<BuildResult>>;
}

/// Route a batch through the environment registry.
///
/// Rejects unsupported environments before touching any artifact, then
/// creates the delegated builder, materializes the whole batch (stopping at
/// the first failure), and finally invokes the builder once.
pub(crate) async fn dispatch_build(
  registry: &EnvironmentRegistry,
  env: &ExecutionEnvironment,
  opts: &BuildOptions,
  backend: &'static str,
  out: &mut (dyn Write + Send),
  tags: &ImageTags,
  artifacts: &mut [Artifact],
) -> crate::Result<Vec<BuildResult>> {
  let factory = registry.resolve(&env.name, backend)?;
  let builder = factory.new_builder(env, opts)?;

  for artifact in artifacts.iter_mut() {
    materialize(artifact)?;
  }

  info!(
    environment = %env.name,
    backend,
    artifacts = artifacts.len(),
    "dispatching build"
  );
  builder
    .build(out, tags, artifacts)
    .await
    .map_err(|source| BuildError::DelegatedBuilder {
      environment: env.name.clone(),
      source,
    })
}
