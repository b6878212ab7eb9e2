//! Integration tests for the Google Cloud Build backend.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use kiln_build::external::{CloudBuildService, DependencyEnumerator};
use kiln_build::{ArtifactBuilder, BuildError, BuildOptions, CloudBuilder};
use kiln_schema::{
  Artifact, BuildResult, BuilderPlugin, DockerConfig, GoogleCloudBuildOptions, ImageTags,
};

struct SpyService {
  runs: AtomicUsize,
}

#[async_trait]
impl CloudBuildService for SpyService {
  async fn run(
    &self,
    out: &mut (dyn Write + Send),
    options: &GoogleCloudBuildOptions,
    _tags: &ImageTags,
    artifacts: &[Artifact],
  ) -> anyhow::Result<Vec<BuildResult>> {
    self.runs.fetch_add(1, Ordering::SeqCst);
    writeln!(out, "submitting {} artifacts to {}", artifacts.len(), options.project_id)?;
    Ok(
      artifacts
        .iter()
        .map(|a| BuildResult::new(&a.image_name, format!("gcr.io/{}/{}", options.project_id, a.image_name)))
        .collect(),
    )
  }
}

struct DockerfileEnumerator;

#[async_trait]
impl DependencyEnumerator<DockerConfig> for DockerfileEnumerator {
  async fn enumerate(&self, _workspace: &Path, config: &DockerConfig) -> anyhow::Result<Vec<PathBuf>> {
    Ok(vec![PathBuf::from(&config.dockerfile_path)])
  }
}

fn cloud_builder() -> (CloudBuilder, Arc<SpyService>) {
  let service = Arc::new(SpyService {
    runs: AtomicUsize::new(0),
  });
  let builder = CloudBuilder::new(
    GoogleCloudBuildOptions {
      project_id: "acme-builds".to_string(),
      ..GoogleCloudBuildOptions::default()
    },
    BuildOptions { skip_tests: true },
    service.clone(),
    Arc::new(DockerfileEnumerator),
  );
  (builder, service)
}

fn docker_artifact(image_name: &str, contents: &str) -> Artifact {
  Artifact::new(image_name, "/src", BuilderPlugin::new("docker", contents))
}

#[tokio::test]
async fn cloud_build_materializes_then_delegates_the_whole_batch() {
  let (builder, service) = cloud_builder();
  let mut artifacts = vec![
    docker_artifact("web", "dockerfilePath: deploy/Dockerfile"),
    docker_artifact("api", "target: release"),
  ];
  let mut out = Vec::new();

  let results = builder
    .build(&mut out, &ImageTags::new(), &mut artifacts)
    .await
    .unwrap();

  assert_eq!(results.len(), 2);
  assert_eq!(results[0].tag, "gcr.io/acme-builds/web");
  assert_eq!(service.runs.load(Ordering::SeqCst), 1);
  assert!(artifacts.iter().all(|a| a.backend.is_some()));
}

#[tokio::test]
async fn invalid_artifact_prevents_submission() {
  let (builder, service) = cloud_builder();
  let mut artifacts = vec![
    docker_artifact("web", "dockerfilePath: deploy/Dockerfile"),
    docker_artifact("api", "dockerfilePath: \"\""),
  ];
  let mut out = Vec::new();

  let err = builder
    .build(&mut out, &ImageTags::new(), &mut artifacts)
    .await
    .unwrap_err();

  assert!(matches!(err, BuildError::ConfigValidation { .. }));
  assert!(err.to_string().contains("api"));
  assert_eq!(service.runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dependencies_resolve_against_the_docker_config() {
  let (builder, _service) = cloud_builder();
  let mut artifact = docker_artifact("web", "dockerfilePath: deploy/Dockerfile");

  let paths = builder.dependencies(&mut artifact).await.unwrap();

  assert_eq!(paths, vec![PathBuf::from("/src/deploy/Dockerfile")]);
}

#[tokio::test]
async fn labels_identify_the_cloud_backend() {
  let (builder, _service) = cloud_builder();
  assert_eq!(
    builder.labels().get("builder").map(String::as_str),
    Some("google-cloud-build")
  );
}
