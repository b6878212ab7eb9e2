//! Build manifest loading.
//!
//! The manifest is the CLI's declarative input: one execution environment
//! and a list of artifacts, each carrying a backend-tagged plugin block.
//! The plugin's `config` block is re-serialized to bytes here so the core
//! decodes it on first use, exactly as the surrounding orchestrator would.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use kiln_schema::{Artifact, BuilderPlugin, ExecutionEnvironment};

/// A loaded manifest, converted into core types.
pub struct Manifest {
  pub environment: ExecutionEnvironment,
  pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ManifestFile {
  environment: EnvironmentDecl,
  artifacts: Vec<ArtifactDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct EnvironmentDecl {
  name: String,
  #[serde(default)]
  properties: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ArtifactDecl {
  image_name: String,
  #[serde(default = "default_workspace")]
  workspace: PathBuf,
  plugin: PluginDecl,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PluginDecl {
  name: String,
  #[serde(default)]
  config: serde_yaml::Value,
}

fn default_workspace() -> PathBuf {
  PathBuf::from(".")
}

/// Load a manifest file and convert it into core types.
pub fn load(path: &Path) -> anyhow::Result<Manifest> {
  let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
  let file: ManifestFile = serde_yaml::from_str(&text).context("parsing manifest")?;

  let environment = ExecutionEnvironment::new(file.environment.name, file.environment.properties);
  let artifacts = file
    .artifacts
    .into_iter()
    .map(|decl| {
      let contents = serde_yaml::to_string(&decl.plugin.config)
        .with_context(|| format!("re-encoding plugin config for '{}'", decl.image_name))?;
      Ok(Artifact::new(
        decl.image_name,
        decl.workspace,
        BuilderPlugin::new(decl.plugin.name, contents.into_bytes()),
      ))
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

  debug!(
    environment = %environment.name,
    artifacts = artifacts.len(),
    "loaded build manifest"
  );
  Ok(Manifest {
    environment,
    artifacts,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn write_manifest(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
  }

  #[test]
  fn loads_environment_and_artifacts() {
    let file = write_manifest(
      r#"
environment:
  name: local
  properties:
    push: false
artifacts:
  - imageName: app
    workspace: /src
    plugin:
      name: bazel
      config:
        buildTarget: "//:app"
"#,
    );

    let manifest = load(file.path()).unwrap();
    assert_eq!(manifest.environment.name, "local");
    assert_eq!(manifest.artifacts.len(), 1);
    assert_eq!(manifest.artifacts[0].image_name, "app");
    assert_eq!(manifest.artifacts[0].workspace, PathBuf::from("/src"));

    // The plugin config survives as a decodable payload.
    let mut artifact = manifest.artifacts.into_iter().next().unwrap();
    kiln_build::materialize(&mut artifact).unwrap();
    assert_eq!(artifact.bazel_config().unwrap().build_target, "//:app");
  }

  #[test]
  fn unknown_manifest_fields_are_rejected() {
    let file = write_manifest("environment: {name: local}\nartifacts: []\nextra: true\n");
    assert!(load(file.path()).is_err());
  }

  #[test]
  fn workspace_defaults_to_the_current_directory() {
    let file = write_manifest(
      "environment: {name: local}\nartifacts:\n  - imageName: app\n    plugin: {name: bazel}\n",
    );
    let manifest = load(file.path()).unwrap();
    assert_eq!(manifest.artifacts[0].workspace, PathBuf::from("."));
  }
}
