//! Interfaces implemented by external collaborators.
//!
//! The mechanics behind these traits are out of scope for this core: running
//! a hermetic build tool's dependency query, parsing Dockerfiles, talking to
//! a container daemon, discovering the active cluster context, or driving a
//! cloud build service. The core only calls through these seams and wraps
//! their failures with artifact or environment context.
//!
//! Cancellation follows the usual async model: dropping the future returned
//! by an async method abandons the outstanding operation, and implementors
//! are expected not to block the executor.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use kiln_schema::{Artifact, BuildResult, GoogleCloudBuildOptions, ImageTags, LocalBuildOptions};

/// Enumerates the source files a backend build depends on.
///
/// Returned paths may be relative to the workspace or absolute; the core
/// normalizes them before handing them to callers.
#[async_trait]
pub trait DependencyEnumerator<C>: Send + Sync {
  async fn enumerate(&self, workspace: &Path, config: &C) -> anyhow::Result<Vec<PathBuf>>;
}

/// Builds a batch of materialized artifacts in one concrete execution
/// environment, writing build logs to `out`.
#[async_trait]
pub trait DelegatedBuilder: Send + Sync {
  async fn build(
    &self,
    out: &mut (dyn Write + Send),
    tags: &ImageTags,
    artifacts: &[Artifact],
  ) -> anyhow::Result<Vec<BuildResult>>;
}

/// Creates delegated builders for the local environment.
pub trait LocalBuilderFactory: Send + Sync {
  fn new_builder(
    &self,
    options: LocalBuildOptions,
    cluster_context: &str,
    skip_tests: bool,
  ) -> anyhow::Result<Box<dyn DelegatedBuilder>>;
}

/// Discovers the active cluster context, used by local builds to decide
/// push behavior.
pub trait ClusterContextProvider: Send + Sync {
  fn current_context(&self) -> anyhow::Result<String>;
}

/// Submits a batch of docker artifacts to Google Cloud Build and streams
/// job logs to `out`. Job submission and status polling live entirely
/// behind this trait.
#[async_trait]
pub trait CloudBuildService: Send + Sync {
  async fn run(
    &self,
    out: &mut (dyn Write + Send),
    options: &GoogleCloudBuildOptions,
    tags: &ImageTags,
    artifacts: &[Artifact],
  ) -> anyhow::Result<Vec<BuildResult>>;
}
