//! Artifact descriptions and backend configuration variants.
//!
//! An artifact arrives with its backend configuration stored generically as
//! an opaque payload inside a [`BuilderPlugin`]. The build core decodes it on
//! first use into exactly one [`BackendConfig`] variant and stores the result
//! back onto the artifact, after which the payload is never read again.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One container image to build: identity plus build instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
  /// Image name, unique within one build invocation.
  pub image_name: String,
  /// Source root for dependency resolution and build context.
  pub workspace: PathBuf,
  /// Opaque backend-tagged configuration, present until materialization.
  pub builder_plugin: Option<BuilderPlugin>,
  /// Materialized backend configuration. `None` until first use.
  pub backend: Option<BackendConfig>,
}

impl Artifact {
  /// Create an artifact whose configuration has not been materialized yet.
  pub fn new(image_name: impl Into<String>, workspace: impl Into<PathBuf>, plugin: BuilderPlugin) -> Self {
    Self {
      image_name: image_name.into(),
      workspace: workspace.into(),
      builder_plugin: Some(plugin),
      backend: None,
    }
  }

  /// The materialized bazel configuration, if this is a bazel artifact.
  pub fn bazel_config(&self) -> Option<&BazelConfig> {
    match &self.backend {
      Some(BackendConfig::Bazel(config)) => Some(config),
      _ => None,
    }
  }

  /// The materialized docker configuration, if this is a docker artifact.
  pub fn docker_config(&self) -> Option<&DockerConfig> {
    match &self.backend {
      Some(BackendConfig::Docker(config)) => Some(config),
      _ => None,
    }
  }
}

/// Backend-tagged opaque configuration payload.
///
/// `contents` holds YAML bytes whose schema is owned by the backend named by
/// `name`. The payload is decoded strictly, and only once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderPlugin {
  /// Backend tag, e.g. `"bazel"` or `"docker"`.
  pub name: String,
  /// Raw configuration payload.
  pub contents: Vec<u8>,
}

impl BuilderPlugin {
  pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
    Self {
      name: name.into(),
      contents: contents.into(),
    }
  }
}

/// Materialized backend configuration. Exactly one variant per artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendConfig {
  Bazel(BazelConfig),
  Docker(DockerConfig),
}

impl BackendConfig {
  /// The backend tag this variant belongs to.
  pub fn backend_name(&self) -> &'static str {
    match self {
      BackendConfig::Bazel(_) => "bazel",
      BackendConfig::Docker(_) => "docker",
    }
  }
}

/// Configuration for artifacts built with bazel.
///
/// Decoded strictly: unknown fields in the payload are rejected rather than
/// silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BazelConfig {
  /// Bazel label of the target producing the image tarball, e.g. `//:app`.
  /// An absent key decodes to the empty string and fails validation.
  #[serde(default)]
  pub build_target: String,
  /// Extra arguments forwarded to the bazel invocation.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub build_args: Vec<String>,
}

/// Configuration for artifacts built from a Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DockerConfig {
  /// Path to the Dockerfile, relative to the workspace.
  #[serde(default = "default_dockerfile_path")]
  pub dockerfile_path: String,
  /// Build-time variables passed to the docker build.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub build_args: BTreeMap<String, String>,
  /// Images used as cache sources.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub cache_from: Vec<String>,
  /// Target stage for multi-stage Dockerfiles. Empty builds the last stage.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub target: String,
}

impl Default for DockerConfig {
  fn default() -> Self {
    Self {
      dockerfile_path: default_dockerfile_path(),
      build_args: BTreeMap::new(),
      cache_from: Vec::new(),
      target: String::new(),
    }
  }
}

fn default_dockerfile_path() -> String {
  "Dockerfile".to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accessors_expose_only_the_materialized_variant() {
    let mut artifact = Artifact::new("app", "/src", BuilderPlugin::new("bazel", ""));
    assert!(artifact.bazel_config().is_none());
    assert!(artifact.docker_config().is_none());

    artifact.backend = Some(BackendConfig::Bazel(BazelConfig {
      build_target: "//:app".to_string(),
      build_args: vec![],
    }));
    assert_eq!(artifact.bazel_config().unwrap().build_target, "//:app");
    assert!(artifact.docker_config().is_none());
  }

  #[test]
  fn docker_config_defaults_dockerfile_path() {
    let config: DockerConfig = serde_yaml::from_str("target: release").unwrap();
    assert_eq!(config.dockerfile_path, "Dockerfile");
    assert_eq!(config.target, "release");
  }

  #[test]
  fn backend_config_reports_its_tag() {
    let bazel = BackendConfig::Bazel(BazelConfig {
      build_target: "//:app".to_string(),
      build_args: vec![],
    });
    assert_eq!(bazel.backend_name(), "bazel");
    assert_eq!(BackendConfig::Docker(DockerConfig::default()).backend_name(), "docker");
  }
}
