//! Error types for build dispatch.
//!
//! Every variant names the offending artifact or environment so a failure
//! deep in a batch is attributable without extra context. Nothing here is
//! retried or swallowed: each error aborts the current call and propagates
//! to the caller.

use thiserror::Error;

/// Errors that can occur while materializing, routing, or delegating builds.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The backend configuration payload could not be parsed, including
  /// payloads carrying fields the backend schema does not know about.
  #[error("decoding {backend} config for '{image_name}': {source}")]
  ConfigDecode {
    image_name: String,
    backend: &'static str,
    #[source]
    source: serde_yaml::Error,
  },

  /// The payload decoded to nothing where a configuration was required.
  #[error("'{image_name}' has an empty {backend} config")]
  EmptyConfig {
    image_name: String,
    backend: &'static str,
  },

  /// A backend-required field is empty after decode.
  #[error("'{image_name}' must have {field}")]
  ConfigValidation {
    image_name: String,
    field: &'static str,
  },

  /// The artifact has neither a materialized configuration nor a plugin
  /// payload to materialize one from.
  #[error("'{image_name}' has no builder plugin configuration")]
  MissingPlugin { image_name: String },

  /// The plugin payload is tagged with a backend this core does not know.
  #[error("'{image_name}' uses unknown builder plugin '{backend}'")]
  UnknownBackend { image_name: String, backend: String },

  /// The artifact is materialized, but for a different backend than the
  /// builder it was handed to. A programming error at the call site.
  #[error("'{image_name}' is not configured for the {expected} backend")]
  WrongBackend {
    image_name: String,
    expected: &'static str,
  },

  /// Environment properties could not be reshaped into backend options.
  #[error("converting '{environment}' environment properties: {source}")]
  EnvironmentAdapt {
    environment: String,
    #[source]
    source: serde_json::Error,
  },

  /// The dependency enumerator failed for an artifact.
  #[error("getting dependencies for '{image_name}': {source}")]
  DependencyResolution {
    image_name: String,
    #[source]
    source: anyhow::Error,
  },

  /// Cluster context discovery failed.
  #[error("getting current cluster context: {source}")]
  ClusterContext {
    #[source]
    source: anyhow::Error,
  },

  /// The delegated builder could not be created.
  #[error("creating builder for environment '{environment}': {source}")]
  BuilderInit {
    environment: String,
    #[source]
    source: anyhow::Error,
  },

  /// No builder is registered for the requested environment.
  #[error("'{environment}' is not a supported environment for builder {backend}")]
  UnsupportedEnvironment {
    environment: String,
    backend: &'static str,
  },

  /// The delegated builder reported a failure.
  #[error("build in environment '{environment}' failed: {source}")]
  DelegatedBuilder {
    environment: String,
    #[source]
    source: anyhow::Error,
  },
}
