//! The bazel backend builder.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use kiln_schema::{Artifact, BazelConfig, BuildResult, ExecutionEnvironment, ImageTags};

use crate::backend::{ArtifactBuilder, BuildOptions, dispatch_build};
use crate::error::BuildError;
use crate::external::DependencyEnumerator;
use crate::materialize::materialize;
use crate::paths::absolute_paths;
use crate::registry::EnvironmentRegistry;

/// Builds artifacts whose images are produced by bazel targets.
pub struct BazelBuilder {
  env: ExecutionEnvironment,
  opts: BuildOptions,
  environments: EnvironmentRegistry,
  dependencies: Arc<dyn DependencyEnumerator<BazelConfig>>,
}

impl BazelBuilder {
  pub fn new(
    env: ExecutionEnvironment,
    opts: BuildOptions,
    environments: EnvironmentRegistry,
    dependencies: Arc<dyn DependencyEnumerator<BazelConfig>>,
  ) -> Self {
    Self {
      env,
      opts,
      environments,
      dependencies,
    }
  }
}

#[async_trait]
impl ArtifactBuilder for BazelBuilder {
  fn labels(&self) -> HashMap<String, String> {
    HashMap::from([("builder".to_string(), "bazel".to_string())])
  }

  async fn dependencies(&self, artifact: &mut Artifact) -> crate::Result<Vec<PathBuf>> {
    materialize(artifact)?;
    let config = artifact.bazel_config().ok_or_else(|| BuildError::WrongBackend {
      image_name: artifact.image_name.clone(),
      expected: "bazel",
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
    dispatch_build(&self.environments, &self.env, &self.opts, "bazel", out, tags, artifacts).await
  }
}
