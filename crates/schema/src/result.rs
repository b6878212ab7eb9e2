//! Build outputs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Map from image name to the fully qualified tag assigned for this
/// invocation, computed by the caller's tagging policy.
pub type ImageTags = HashMap<String, String>;

/// The image reference produced for one artifact.
///
/// Created once per successful build, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
  /// Image name of the artifact that was built.
  pub image_name: String,
  /// Fully qualified reference of the produced image.
  pub tag: String,
}

impl BuildResult {
  pub fn new(image_name: impl Into<String>, tag: impl Into<String>) -> Self {
    Self {
      image_name: image_name.into(),
      tag: tag.into(),
    }
  }
}
