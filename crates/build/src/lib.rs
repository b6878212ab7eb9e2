//! kiln-build: Build dispatch core for kiln
//!
//! This crate turns declarative artifact descriptions into backend builds:
//! - `materialize`: first-use decoding of opaque backend configuration
//! - `adapt_properties`: reshaping generic environment properties into
//!   backend-typed options
//! - `EnvironmentRegistry`: routing from an environment name to the one
//!   delegated builder bound to it
//! - `BazelBuilder` / `DockerBuilder` / `CloudBuilder`: the backend builders
//!   exposed to the orchestrator
//!
//! The mechanics of enumerating dependencies, talking to a container daemon,
//! and running cloud build jobs live behind the collaborator traits in
//! [`external`].

pub mod backend;
mod environment;
mod error;
pub mod external;
mod materialize;
mod paths;
mod registry;

pub use backend::{ArtifactBuilder, BazelBuilder, BuildOptions, CloudBuilder, DockerBuilder};
pub use environment::adapt_properties;
pub use error::BuildError;
pub use materialize::materialize;
pub use paths::absolute_paths;
pub use registry::{EnvironmentFactory, EnvironmentRegistry, LocalEnvironment};

/// Result type for build dispatch operations.
pub type Result<T> = std::result::Result<T, BuildError>;
