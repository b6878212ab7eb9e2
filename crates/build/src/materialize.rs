//! First-use decoding of opaque backend configuration payloads.
//!
//! An artifact's configuration travels as YAML bytes tagged with a backend
//! name until a builder needs it. `materialize` decodes those bytes strictly
//! into the backend's config struct, validates the backend's required
//! fields, and stores the result onto the artifact. The payload is decoded
//! at most once: a second call on the same artifact is a no-op.

use serde::de::DeserializeOwned;
use tracing::debug;

use kiln_schema::{Artifact, BackendConfig, BazelConfig, DockerConfig};

use crate::error::BuildError;

/// Decode an artifact's plugin payload into its backend configuration.
///
/// Idempotent: returns immediately if the artifact is already materialized.
/// Mutates only `artifact.backend`.
pub fn materialize(artifact: &mut Artifact) -> crate::Result<()> {
  if artifact.backend.is_some() {
    return Ok(());
  }

  let plugin = artifact
    .builder_plugin
    .as_ref()
    .ok_or_else(|| BuildError::MissingPlugin {
      image_name: artifact.image_name.clone(),
    })?;

  let backend = match plugin.name.as_str() {
    "bazel" => {
      let config: BazelConfig = decode_strict(&artifact.image_name, "bazel", &plugin.contents)?;
      if config.build_target.is_empty() {
        return Err(BuildError::ConfigValidation {
          image_name: artifact.image_name.clone(),
          field: "an associated build target",
        });
      }
      BackendConfig::Bazel(config)
    }
    "docker" => {
      let config: DockerConfig = decode_strict(&artifact.image_name, "docker", &plugin.contents)?;
      if config.dockerfile_path.is_empty() {
        return Err(BuildError::ConfigValidation {
          image_name: artifact.image_name.clone(),
          field: "a dockerfile path",
        });
      }
      BackendConfig::Docker(config)
    }
    other => {
      return Err(BuildError::UnknownBackend {
        image_name: artifact.image_name.clone(),
        backend: other.to_string(),
      });
    }
  };

  debug!(
    image = %artifact.image_name,
    backend = backend.backend_name(),
    "materialized artifact configuration"
  );
  artifact.backend = Some(backend);
  Ok(())
}

/// Strict YAML decode of a payload into a backend config struct.
///
/// Unknown fields are rejected by the config structs themselves
/// (`deny_unknown_fields`). A payload decoding to YAML null is an error:
/// an artifact with no configuration at all is misconfigured, not default.
fn decode_strict<T: DeserializeOwned>(
  image_name: &str,
  backend: &'static str,
  contents: &[u8],
) -> crate::Result<T> {
  let decoded: Option<T> =
    serde_yaml::from_slice(contents).map_err(|source| BuildError::ConfigDecode {
      image_name: image_name.to_string(),
      backend,
      source,
    })?;
  decoded.ok_or_else(|| BuildError::EmptyConfig {
    image_name: image_name.to_string(),
    backend,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use kiln_schema::BuilderPlugin;

  fn bazel_artifact(contents: &str) -> Artifact {
    Artifact::new("app", "/src", BuilderPlugin::new("bazel", contents))
  }

  #[test]
  fn materializes_bazel_build_target() {
    let mut artifact = bazel_artifact("buildTarget: //:app");
    materialize(&mut artifact).unwrap();
    assert_eq!(artifact.bazel_config().unwrap().build_target, "//:app");
  }

  #[test]
  fn second_call_does_not_redecode() {
    let mut artifact = bazel_artifact("buildTarget: //:app");
    materialize(&mut artifact).unwrap();

    // Corrupt the payload. If the second call decoded it, it would fail.
    artifact.builder_plugin.as_mut().unwrap().contents = b"not: [valid".to_vec();
    materialize(&mut artifact).unwrap();
    assert_eq!(artifact.bazel_config().unwrap().build_target, "//:app");
  }

  #[test]
  fn unknown_payload_field_is_rejected() {
    let mut artifact = bazel_artifact("buildTarget: //:app\ntyposedField: true");
    let err = materialize(&mut artifact).unwrap_err();
    assert!(matches!(err, BuildError::ConfigDecode { .. }), "got {err:?}");
    assert!(artifact.backend.is_none());
  }

  #[test]
  fn empty_build_target_names_the_artifact() {
    let mut artifact = bazel_artifact("buildTarget: \"\"");
    let err = materialize(&mut artifact).unwrap_err();
    assert!(matches!(err, BuildError::ConfigValidation { .. }));
    assert!(err.to_string().contains("app"));
    assert!(err.to_string().contains("build target"));
  }

  #[test]
  fn absent_build_target_is_a_validation_error() {
    let mut artifact = bazel_artifact("buildArgs: [\"-c\", \"opt\"]");
    let err = materialize(&mut artifact).unwrap_err();
    assert!(matches!(err, BuildError::ConfigValidation { .. }), "got {err:?}");
    assert!(err.to_string().contains("app"));
    assert!(err.to_string().contains("build target"));
  }

  #[test]
  fn null_payload_is_an_empty_config() {
    let mut artifact = bazel_artifact("");
    let err = materialize(&mut artifact).unwrap_err();
    assert!(matches!(err, BuildError::EmptyConfig { .. }), "got {err:?}");
  }

  #[test]
  fn missing_plugin_is_reported() {
    let mut artifact = bazel_artifact("buildTarget: //:app");
    artifact.builder_plugin = None;
    let err = materialize(&mut artifact).unwrap_err();
    assert!(matches!(err, BuildError::MissingPlugin { .. }));
  }

  #[test]
  fn unknown_backend_tag_is_reported() {
    let mut artifact = Artifact::new("app", "/src", BuilderPlugin::new("buildah", "x: 1"));
    let err = materialize(&mut artifact).unwrap_err();
    assert!(err.to_string().contains("buildah"));
  }

  #[test]
  fn docker_payload_materializes_with_defaults() {
    let mut artifact = Artifact::new("web", "/src", BuilderPlugin::new("docker", "target: release"));
    materialize(&mut artifact).unwrap();
    let config = artifact.docker_config().unwrap();
    assert_eq!(config.dockerfile_path, "Dockerfile");
    assert_eq!(config.target, "release");
  }
}
