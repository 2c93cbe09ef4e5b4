use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex},
};

use anyhow::{Result, bail};
use k8s_openapi::api::rbac::v1::RoleBinding;

use ocputils::clients::OcpClients;
use ocputils::ocp::{Autoscaler, DeploymentConfig, Group, Image, Project, Resource, User};

/// Mock cluster for testing
#[derive(Clone, Default)]
pub struct MockOcpClients {
  pub projects: Vec<Project>,
  pub namespaces: Vec<String>,
  pub groups: Vec<Group>,
  pub users: Vec<User>,
  /// Role bindings keyed by namespace
  pub role_bindings: HashMap<String, Vec<RoleBinding>>,
  pub deployment_configs: Vec<DeploymentConfig>,
  pub deployments: Vec<Resource>,
  /// Images keyed by digest
  pub images: HashMap<String, Image>,
  pub autoscalers: Vec<Autoscaler>,
  /// Namespaces whose role bindings and deployment configs fail to list
  pub failing_namespaces: HashSet<String>,
  /// Names of the client methods called, in order
  pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MockOcpClients {
  fn record(&self, call: &'static str) {
    self.calls.lock().unwrap().push(call);
  }

  pub fn called(&self, call: &str) -> bool {
    self.calls.lock().unwrap().iter().any(|c| *c == call)
  }
}

impl OcpClients for MockOcpClients {
  async fn get_projects(&self) -> Result<Vec<Project>> {
    self.record("get_projects");
    Ok(self.projects.clone())
  }

  async fn get_namespaces(&self) -> Result<Vec<String>> {
    self.record("get_namespaces");
    Ok(self.namespaces.clone())
  }

  async fn get_groups(&self) -> Result<Vec<Group>> {
    self.record("get_groups");
    Ok(self.groups.clone())
  }

  async fn get_group(&self, name: &str) -> Result<Group> {
    self.record("get_group");
    match self.groups.iter().find(|g| g.name == name) {
      Some(group) => Ok(group.clone()),
      None => bail!("group {name} not found"),
    }
  }

  async fn get_users(&self) -> Result<Vec<User>> {
    self.record("get_users");
    Ok(self.users.clone())
  }

  async fn get_role_bindings(&self, namespace: &str) -> Result<Vec<RoleBinding>> {
    self.record("get_role_bindings");
    if self.failing_namespaces.contains(namespace) {
      bail!("forbidden: role bindings in {namespace}");
    }
    Ok(self.role_bindings.get(namespace).cloned().unwrap_or_default())
  }

  async fn get_deployment_configs(&self, namespace: Option<&str>) -> Result<Vec<DeploymentConfig>> {
    self.record("get_deployment_configs");
    if let Some(namespace) = namespace {
      if self.failing_namespaces.contains(namespace) {
        bail!("forbidden: deployment configs in {namespace}");
      }
    }

    Ok(
      self
        .deployment_configs
        .iter()
        .filter(|dc| namespace.is_none_or(|ns| dc.namespace == ns))
        .cloned()
        .collect(),
    )
  }

  async fn get_deployments(&self) -> Result<Vec<Resource>> {
    self.record("get_deployments");
    Ok(self.deployments.clone())
  }

  async fn get_image(&self, name: &str) -> Result<Image> {
    self.record("get_image");
    match self.images.get(name) {
      Some(image) => Ok(image.clone()),
      None => bail!("image {name} not found"),
    }
  }

  async fn get_autoscalers(&self) -> Result<Vec<Autoscaler>> {
    self.record("get_autoscalers");
    Ok(self.autoscalers.clone())
  }
}

/// Mock that returns errors for all methods
pub struct MockOcpClientsError;

impl OcpClients for MockOcpClientsError {
  async fn get_projects(&self) -> Result<Vec<Project>> { bail!("mock cluster error") }
  async fn get_namespaces(&self) -> Result<Vec<String>> { bail!("mock cluster error") }
  async fn get_groups(&self) -> Result<Vec<Group>> { bail!("mock cluster error") }
  async fn get_group(&self, _name: &str) -> Result<Group> { bail!("mock cluster error") }
  async fn get_users(&self) -> Result<Vec<User>> { bail!("mock cluster error") }
  async fn get_role_bindings(&self, _namespace: &str) -> Result<Vec<RoleBinding>> { bail!("mock cluster error") }
  async fn get_deployment_configs(&self, _namespace: Option<&str>) -> Result<Vec<DeploymentConfig>> { bail!("mock cluster error") }
  async fn get_deployments(&self) -> Result<Vec<Resource>> { bail!("mock cluster error") }
  async fn get_image(&self, _name: &str) -> Result<Image> { bail!("mock cluster error") }
  async fn get_autoscalers(&self) -> Result<Vec<Autoscaler>> { bail!("mock cluster error") }
}
