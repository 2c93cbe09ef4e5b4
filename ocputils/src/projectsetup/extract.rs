use std::collections::BTreeMap;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use k8s_openapi::api::rbac::v1::RoleBinding;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{clients::OcpClients, config::ProjectsetupConfig, projectsetup::Role};

const ROLE_ADMIN: &str = "admin";
const ROLE_EDIT: &str = "edit";
const ROLE_VIEW: &str = "view";
const SUBJECT_GROUP: &str = "Group";

/// A namespace that belongs to a projectsetup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectsetupNamespace {
  pub name: String,
  pub role: Role,
  /// Groups bound to the `edit` role in this namespace
  pub editor_groups: Vec<String>,
  /// Groups bound to the `view` role in this namespace
  pub viewer_groups: Vec<String>,
}

impl ProjectsetupNamespace {
  pub fn new(name: &str, role: Role) -> Self {
    Self {
      name: name.to_owned(),
      role,
      editor_groups: Vec::new(),
      viewer_groups: Vec::new(),
    }
  }

  pub fn add_editor_group(&mut self, group: &str) {
    push_unique(&mut self.editor_groups, group);
  }

  pub fn add_viewer_group(&mut self, group: &str) {
    push_unique(&mut self.viewer_groups, group);
  }
}

/// Related namespaces sharing a base name, with the groups owning them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectsetup {
  pub name: String,
  /// Groups bound to the `admin` role in any of the namespaces
  pub owner_groups: Vec<String>,
  pub namespaces: Vec<ProjectsetupNamespace>,
}

impl Projectsetup {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_owned(),
      owner_groups: Vec::new(),
      namespaces: Vec::new(),
    }
  }

  pub fn add_owner_group(&mut self, group: &str) {
    push_unique(&mut self.owner_groups, group);
  }
}

/// Groups are kept in the order they were first seen
fn push_unique(groups: &mut Vec<String>, group: &str) {
  if !groups.iter().any(|g| g == group) {
    groups.push(group.to_owned());
  }
}

/// Result of extracting projectsetups from the namespaces of a cluster
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Extraction {
  /// Projectsetups sorted by name
  pub projectsetups: Vec<Projectsetup>,
  /// Namespaces that are neither reserved nor carry a known suffix
  pub unmapped: Vec<String>,
}

/// Group namespace names into projectsetups
///
/// Reserved platform namespaces are dropped; names without a known suffix are
/// returned as unmapped in input order.
pub fn aggregate<'a>(
  names: impl IntoIterator<Item = &'a str>,
  config: &ProjectsetupConfig,
) -> (BTreeMap<String, Projectsetup>, Vec<String>) {
  let table = config.suffix_table();
  let mut setups: BTreeMap<String, Projectsetup> = BTreeMap::new();
  let mut unmapped = Vec::new();

  for name in names {
    if config.is_reserved(name) {
      debug!("Skipping platform namespace {name}");
      continue;
    }

    match table.strip_and_identify(name) {
      Some((role, base)) => {
        setups
          .entry(base.to_owned())
          .or_insert_with(|| Projectsetup::new(base))
          .namespaces
          .push(ProjectsetupNamespace::new(name, role));
      }
      None => unmapped.push(name.to_owned()),
    }
  }

  (setups, unmapped)
}

/// Record the groups found in the role bindings of one namespace of the projectsetup
///
/// Only the first subject of a binding is consulted, and only when it is a group.
pub fn apply_role_bindings(setup: &mut Projectsetup, index: usize, bindings: &[RoleBinding]) {
  for binding in bindings {
    let group = match binding.subjects.as_deref() {
      Some([first, ..]) if first.kind == SUBJECT_GROUP => first.name.as_str(),
      _ => continue,
    };

    match binding.role_ref.name.as_str() {
      ROLE_ADMIN => setup.add_owner_group(group),
      ROLE_EDIT => {
        if let Some(namespace) = setup.namespaces.get_mut(index) {
          namespace.add_editor_group(group);
        }
      }
      ROLE_VIEW => {
        if let Some(namespace) = setup.namespaces.get_mut(index) {
          namespace.add_viewer_group(group);
        }
      }
      _ => {}
    }
  }
}

fn progress_bar(len: usize, message: &'static str) -> Result<ProgressBar> {
  let pb = ProgressBar::new(len as u64);
  pb.set_style(ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")?.progress_chars("=> "));
  pb.set_message(message);

  Ok(pb)
}

/// Extract projectsetups from all projects in the cluster
///
/// Failing to list the projects is fatal. Failing to list the role bindings of
/// a single namespace is logged and that namespace contributes no groups.
pub async fn extract<C: OcpClients>(client: &C, config: &ProjectsetupConfig) -> Result<Extraction> {
  let projects = client.get_projects().await?;
  info!("Extracting {} namespaces", projects.len());

  let pb = progress_bar(projects.len(), "Extracting namespaces")?;
  let (mut setups, unmapped) = aggregate(
    projects.iter().map(|p| {
      pb.inc(1);
      p.name.as_str()
    }),
    config,
  );
  pb.finish_and_clear();

  let total = setups.values().map(|s| s.namespaces.len()).sum();
  let pb = progress_bar(total, "Extracting role bindings")?;
  for setup in setups.values_mut() {
    for index in 0..setup.namespaces.len() {
      pb.inc(1);
      let namespace = setup.namespaces[index].name.clone();
      match client.get_role_bindings(&namespace).await {
        Ok(bindings) => apply_role_bindings(setup, index, &bindings),
        Err(err) => warn!("Skipping role bindings of {namespace}: {err:#}"),
      }
    }
  }
  pb.finish_and_clear();

  Ok(Extraction {
    projectsetups: setups.into_values().collect(),
    unmapped,
  })
}
