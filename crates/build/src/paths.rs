//! Path normalization for dependency lists.

use std::path::{Path, PathBuf};

/// Normalize enumerator output to absolute paths.
///
/// Backends return dependency paths either relative to the artifact
/// workspace or already absolute. Callers (the watch subsystem in
/// particular) need one uniform representation, so relative paths are
/// anchored at the workspace, and a relative workspace is itself anchored
/// at the process working directory.
pub fn absolute_paths(workspace: &Path, paths: Vec<PathBuf>) -> Vec<PathBuf> {
  paths
    .into_iter()
    .map(|path| absolutize(workspace, path))
    .collect()
}

fn absolutize(workspace: &Path, path: PathBuf) -> PathBuf {
  if path.is_absolute() {
    return path;
  }
  let anchored = workspace.join(path);
  if anchored.is_absolute() {
    anchored
  } else {
    match std::env::current_dir() {
      Ok(cwd) => cwd.join(anchored),
      Err(_) => anchored,
    }
  }
}
