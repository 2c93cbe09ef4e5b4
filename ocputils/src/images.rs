use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
  clients::OcpClients,
  config::ImageConfig,
  ocp::{DeploymentConfig, resources::image_labels},
};

/// A container image of a deployment config and, when labelled, its git origin
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageMapping {
  pub namespace: String,
  pub deployment_config: String,
  pub git_project: Option<String>,
  pub git_repository: Option<String>,
  pub image: String,
}

impl ImageMapping {
  fn to_row(&self) -> String {
    [
      self.namespace.trim(),
      self.deployment_config.trim(),
      self.git_project.as_deref().unwrap_or_default().trim(),
      self.git_repository.as_deref().unwrap_or_default().trim(),
      self.image.trim(),
    ]
    .join("\t")
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImageReport {
  pub mapped: Vec<ImageMapping>,
  /// Images without a usable git label, sorted
  pub unmapped: Vec<ImageMapping>,
}

/// Column names existing spreadsheets are keyed on
const HEADER: &str = "OS NameSpace\tOS Deployment Config\tBitBucket Project\tBit Bucket Repo\tOS Image";

impl ImageReport {
  /// Tab separated rows: header, mapped images, then the unmapped ones
  pub fn to_text(&self) -> String {
    let mut output = format!("{HEADER}\n");
    for mapping in self.mapped.iter().chain(self.unmapped.iter()) {
      output.push_str(&mapping.to_row());
      output.push('\n');
    }

    output
  }
}

/// The digest an image is referenced by, if it is referenced by digest at all
pub fn image_digest(image: &str) -> Option<&str> {
  image.rsplit_once('@').map(|(_, digest)| digest)
}

/// Value of the first label matching the configured git label key
pub fn find_git_label(metadata: &serde_json::Value, config: &ImageConfig) -> Option<String> {
  image_labels(metadata)
    .into_iter()
    .find(|(key, _)| config.matches_label(key))
    .map(|(_, value)| value)
}

/// Split a git url such as `ssh://git@host:7999/project/repo.git` into project and repository
///
/// Returns `None` when the url has fewer than five `/` separated segments.
pub fn parse_git_url(url: &str) -> Option<(String, String)> {
  let parts: Vec<&str> = url.split('/').collect();
  if parts.len() < 5 {
    return None;
  }
  if parts.len() != 5 {
    warn!("Git url should have had 5 parts: {url}");
  }

  Some((parts[3].trim().to_owned(), parts[4].trim().to_owned()))
}

async fn map_deployment_config<C: OcpClients>(
  client: &C,
  dc: &DeploymentConfig,
  config: &ImageConfig,
  report: &mut ImageReport,
) {
  for container in &dc.containers {
    if config.skip_container(&container.name) {
      debug!("Skipping container {} of {}/{}", container.name, dc.namespace, dc.name);
      continue;
    }

    let image = container.image.as_deref().unwrap_or_default();
    let Some(digest) = image_digest(image) else {
      debug!("Skipping image {image} not referenced by digest");
      continue;
    };

    let fetched = match client.get_image(digest).await {
      Ok(fetched) => fetched,
      Err(err) => {
        warn!("Error getting image {digest}: {err:#}");
        continue;
      }
    };

    let mut mapping = ImageMapping {
      namespace: dc.namespace.clone(),
      deployment_config: dc.name.clone(),
      git_project: None,
      git_repository: None,
      image: image.to_owned(),
    };

    let git_url = fetched
      .docker_image_metadata
      .as_ref()
      .and_then(|metadata| find_git_label(metadata, config));

    match git_url.as_deref().map(|url| (url, parse_git_url(url))) {
      Some((_, Some((project, repository)))) => {
        mapping.git_project = Some(project);
        mapping.git_repository = Some(repository);
        report.mapped.push(mapping);
      }
      Some((url, None)) => {
        warn!("Unable to extract git project from {url} of image {digest}");
        report.unmapped.push(mapping);
      }
      None => report.unmapped.push(mapping),
    }
  }
}

/// Correlate the digest-referenced images of all deployment configs with their git origin
///
/// Listing namespaces is fatal on failure; a namespace whose deployment configs
/// cannot be listed, or an image that cannot be fetched, is logged and skipped.
pub async fn correlate<C: OcpClients>(client: &C, config: &ImageConfig) -> Result<ImageReport> {
  let namespaces = client.get_namespaces().await?;
  info!("Matching images in {} namespaces", namespaces.len());

  let mut report = ImageReport::default();
  for namespace in &namespaces {
    let dcs = match client.get_deployment_configs(Some(namespace)).await {
      Ok(dcs) => dcs,
      Err(err) => {
        warn!("Skipping namespace {namespace}: {err:#}");
        continue;
      }
    };

    for dc in &dcs {
      map_deployment_config(client, dc, config, &mut report).await;
    }
  }

  report.unmapped.sort_by_key(|m| m.to_row());

  Ok(report)
}
