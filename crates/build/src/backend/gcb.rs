//! The Google Cloud Build backend builder.
//!
//! Cloud builds are docker builds executed remotely: dependency resolution
//! uses the docker enumerator, while job submission and status polling live
//! behind the [`CloudBuildService`] collaborator.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use kiln_schema::{Artifact, BuildResult, DockerConfig, GoogleCloudBuildOptions, ImageTags};

use crate::backend::{ArtifactBuilder, BuildOptions};
use crate::error::BuildError;
use crate::external::{CloudBuildService, DependencyEnumerator};
use crate::materialize::materialize;
use crate::paths::absolute_paths;

/// Time to wait between polls of a cloud build job's status.
pub const CLOUD_BUILD_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Job states reported by the Cloud Build API.
pub mod status {
  /// Status of the build is unknown.
  pub const UNKNOWN: &str = "STATUS_UNKNOWN";
  /// Build is queued; work has not yet begun.
  pub const QUEUED: &str = "QUEUED";
  /// Build is being executed.
  pub const WORKING: &str = "WORKING";
  /// Build finished successfully.
  pub const SUCCESS: &str = "SUCCESS";
  /// Build failed to complete successfully.
  pub const FAILURE: &str = "FAILURE";
  /// Build failed due to an internal cause.
  pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
  /// Build took longer than was allowed.
  pub const TIMEOUT: &str = "TIMEOUT";
  /// Build was canceled by a user.
  pub const CANCELLED: &str = "CANCELLED";
}

/// Builds docker artifacts on Google Cloud Build.
pub struct CloudBuilder {
  options: GoogleCloudBuildOptions,
  opts: BuildOptions,
  service: Arc<dyn CloudBuildService>,
  dependencies: Arc<dyn DependencyEnumerator<DockerConfig>>,
}

impl CloudBuilder {
  pub fn new(
    options: GoogleCloudBuildOptions,
    opts: BuildOptions,
    service: Arc<dyn CloudBuildService>,
    dependencies: Arc<dyn DependencyEnumerator<DockerConfig>>,
  ) -> Self {
    Self {
      options,
      opts,
      service,
      dependencies,
    }
  }
}

#[async_trait]
impl ArtifactBuilder for CloudBuilder {
  fn labels(&self) -> HashMap<String, String> {
    HashMap::from([("builder".to_string(), "google-cloud-build".to_string())])
  }

  async fn dependencies(&self, artifact: &mut Artifact) -> crate::Result<Vec<PathBuf>> {
    materialize(artifact)?;
    let config = artifact.docker_config().ok_or_else(|| BuildError::WrongBackend {
      image_name: artifact.image_name.clone(),
      expected: "docker",
    })?;
    let paths = self
      .dependencies
      .enumerate(&artifact.workspace, config)
      .await
      .map_err(|source| BuildError::DependencyResolution {
        image_name: artifact.image_name.clone(),
        source,
      })?;
    Ok(absolute_paths(&artifact.workspace, paths))
  }

  async fn build(
    &self,
    out: &mut (dyn Write + Send),
    tags: &ImageTags,
    artifacts: &mut [Artifact],
  ) -> crate::Result<Vec<BuildResult>> {
    for artifact in artifacts.iter_mut() {
      materialize(artifact)?;
    }

    info!(
      project = %self.options.project_id,
      skip_tests = self.opts.skip_tests,
      artifacts = artifacts.len(),
      "submitting cloud build"
    );
    self
      .service
      .run(out, &self.options, tags, artifacts)
      .await
      .map_err(|source| BuildError::DelegatedBuilder {
        environment: "google-cloud-build".to_string(),
        source,
      })
  }
}
