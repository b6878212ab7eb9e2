//! Execution environments and their backend-specific options.
//!
//! An environment carries a free-form properties bag. Each backend
//! reinterprets the bag as its own strongly-typed options struct through a
//! structural conversion: unknown fields are ignored, missing fields take
//! their defaults, and an absent bag is the default configuration.

use serde::{Deserialize, Serialize};

/// Name of the local execution environment.
pub const LOCAL_ENVIRONMENT: &str = "local";

/// The target context a build runs in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEnvironment {
  /// Environment name, e.g. `"local"`.
  pub name: String,
  /// Generic key/value options, reinterpreted per backend.
  #[serde(default)]
  pub properties: Option<serde_json::Value>,
}

impl ExecutionEnvironment {
  pub fn new(name: impl Into<String>, properties: Option<serde_json::Value>) -> Self {
    Self {
      name: name.into(),
      properties,
    }
  }

  /// The local environment with no properties set.
  pub fn local() -> Self {
    Self::new(LOCAL_ENVIRONMENT, None)
  }
}

/// Options for builds executed on the local machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalBuildOptions {
  /// Whether built images are pushed to a registry. `None` lets the
  /// delegated builder decide based on the cluster context.
  #[serde(default)]
  pub push: Option<bool>,
  /// Use the docker CLI instead of the daemon API.
  #[serde(default)]
  pub use_docker_cli: bool,
  /// Enable BuildKit for docker builds.
  #[serde(default)]
  pub use_buildkit: bool,
}

/// Options for builds submitted to Google Cloud Build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCloudBuildOptions {
  /// GCP project the build jobs run in.
  #[serde(default)]
  pub project_id: String,
  /// Builder image used to run docker builds.
  #[serde(default = "default_docker_image")]
  pub docker_image: String,
  /// Machine type for the build job. Empty uses the service default.
  #[serde(default)]
  pub machine_type: String,
  /// Job timeout, in the duration format the service accepts. Empty uses
  /// the service default.
  #[serde(default)]
  pub timeout: String,
}

impl Default for GoogleCloudBuildOptions {
  fn default() -> Self {
    Self {
      project_id: String::new(),
      docker_image: default_docker_image(),
      machine_type: String::new(),
      timeout: String::new(),
    }
  }
}

fn default_docker_image() -> String {
  "gcr.io/cloud-builders/docker".to_string()
}
