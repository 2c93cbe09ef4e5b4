use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::projectsetup::{Role, SuffixTable};

/// Top-level configuration loaded from `.ocputils.yaml` or an explicit path.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub projectsetups: ProjectsetupConfig,

  #[serde(default)]
  pub images: ImageConfig,
}

/// Configuration for extracting projectsetups from namespaces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectsetupConfig {
  /// Platform namespaces starting with one of these prefixes are never classified
  #[serde(default = "default_reserved_prefixes")]
  pub reserved_prefixes: Vec<String>,

  /// Namespace suffixes and the role they imply
  #[serde(default = "default_suffixes")]
  pub suffixes: Vec<SuffixRole>,

  /// `apiVersion` written into generated definitions
  #[serde(default = "default_api_version")]
  pub api_version: String,

  /// Namespace of the operator that consumes the generated definitions
  #[serde(default = "default_operator_namespace")]
  pub operator_namespace: String,
}

/// A namespace suffix and the role it maps to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRole {
  pub suffix: String,
  pub role: Role,
}

impl SuffixRole {
  fn new(suffix: &str, role: Role) -> Self {
    Self {
      suffix: suffix.to_owned(),
      role,
    }
  }
}

fn default_reserved_prefixes() -> Vec<String> {
  ["kube", "openshift", "default", "management"]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn default_suffixes() -> Vec<SuffixRole> {
  vec![
    SuffixRole::new("-ci", Role::Build),
    SuffixRole::new("-sit", Role::Deploy),
    SuffixRole::new("-brumm", Role::Deploy),
    SuffixRole::new("-nasse", Role::Deploy),
    SuffixRole::new("-tussi", Role::Deploy),
    SuffixRole::new("-dev", Role::Deploy),
    SuffixRole::new("-test", Role::Deploy),
    SuffixRole::new("-atest", Role::Deploy),
    SuffixRole::new("-itest", Role::Deploy),
    SuffixRole::new("-at", Role::Deploy),
    SuffixRole::new("-it", Role::Deploy),
    SuffixRole::new("-prod-ready", Role::Promote),
  ]
}

fn default_api_version() -> String {
  "management.telenor.no/projectv1".to_string()
}

fn default_operator_namespace() -> String {
  "projects-operator".to_string()
}

impl Default for ProjectsetupConfig {
  fn default() -> Self {
    Self {
      reserved_prefixes: default_reserved_prefixes(),
      suffixes: default_suffixes(),
      api_version: default_api_version(),
      operator_namespace: default_operator_namespace(),
    }
  }
}

impl ProjectsetupConfig {
  /// Returns true for platform namespaces that are excluded before classification
  pub fn is_reserved(&self, namespace: &str) -> bool {
    self.reserved_prefixes.iter().any(|p| namespace.starts_with(p.as_str()))
  }

  pub fn suffix_table(&self) -> SuffixTable {
    SuffixTable::new(self.suffixes.iter().map(|s| (s.suffix.clone(), s.role)))
  }
}

/// How the git label key is matched against the image labels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMatch {
  /// Any label whose key contains the configured key
  #[default]
  Substring,
  /// Only a label whose key, trimmed of whitespace, equals the configured key
  Exact,
}

/// Configuration for correlating images with their git origin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageConfig {
  #[serde(default = "default_git_label")]
  pub git_label: String,

  #[serde(default)]
  pub label_match: LabelMatch,

  /// Containers whose name contains one of these markers are skipped
  #[serde(default = "default_skip_containers")]
  pub skip_containers: Vec<String>,
}

fn default_git_label() -> String {
  "git.url".to_string()
}

fn default_skip_containers() -> Vec<String> {
  vec!["sidecar".to_string()]
}

impl Default for ImageConfig {
  fn default() -> Self {
    Self {
      git_label: default_git_label(),
      label_match: LabelMatch::default(),
      skip_containers: default_skip_containers(),
    }
  }
}

impl ImageConfig {
  pub fn skip_container(&self, name: &str) -> bool {
    self.skip_containers.iter().any(|marker| name.contains(marker.as_str()))
  }

  pub fn matches_label(&self, key: &str) -> bool {
    match self.label_match {
      LabelMatch::Substring => key.contains(self.git_label.as_str()),
      LabelMatch::Exact => key.trim() == self.git_label,
    }
  }
}

const DEFAULT_CONFIG_FILE: &str = ".ocputils.yaml";

/// Load configuration from an explicit path, the default `.ocputils.yaml` in the
/// current working directory, or fall back to `Config::default()`.
pub fn load(path: Option<&str>) -> Result<Config> {
  load_from(path, std::env::current_dir().ok().as_deref())
}

fn load_from(path: Option<&str>, base_dir: Option<&std::path::Path>) -> Result<Config> {
  if let Some(p) = path {
    let contents = std::fs::read_to_string(p).with_context(|| format!("Failed to read config file: {p}"))?;
    let config: Config =
      serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse config file: {p}"))?;
    return Ok(config);
  }

  if let Some(dir) = base_dir {
    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
      let contents = std::fs::read_to_string(&default_path)
        .with_context(|| format!("Failed to read config file: {}", default_path.display()))?;
      let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", default_path.display()))?;
      return Ok(config);
    }
  }

  Ok(Config::default())
}
