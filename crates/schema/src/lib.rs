//! kiln-schema: Data model for kiln
//!
//! This crate provides the fundamental types shared by the build core and
//! its callers:
//! - `Artifact`: one container image to build, with its backend configuration
//! - `BackendConfig`: the per-backend configuration variants
//! - `ExecutionEnvironment`: where a build runs and its generic options
//! - `BuildResult`: the image reference produced for one artifact

mod artifact;
mod environment;
mod result;

pub use artifact::{Artifact, BackendConfig, BazelConfig, BuilderPlugin, DockerConfig};
pub use environment::{
  ExecutionEnvironment, GoogleCloudBuildOptions, LOCAL_ENVIRONMENT, LocalBuildOptions,
};
pub use result::{BuildResult, ImageTags};
