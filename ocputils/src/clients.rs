use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use k8s_openapi::api::rbac::v1::RoleBinding;
use kube::config::{KubeConfigOptions, Kubeconfig};

use crate::ocp::{
  Autoscaler, DeploymentConfig, Group, Image, Project, Resource, User,
  resources::{self as ocp_resources},
};

/// Trait abstracting all cluster API operations used by ocputils
pub trait OcpClients {
  fn get_projects(&self) -> impl std::future::Future<Output = Result<Vec<Project>>> + Send;
  fn get_namespaces(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
  fn get_groups(&self) -> impl std::future::Future<Output = Result<Vec<Group>>> + Send;
  fn get_group(&self, name: &str) -> impl std::future::Future<Output = Result<Group>> + Send;
  fn get_users(&self) -> impl std::future::Future<Output = Result<Vec<User>>> + Send;
  fn get_role_bindings(&self, namespace: &str) -> impl std::future::Future<Output = Result<Vec<RoleBinding>>> + Send;
  fn get_deployment_configs(
    &self,
    namespace: Option<&str>,
  ) -> impl std::future::Future<Output = Result<Vec<DeploymentConfig>>> + Send;
  fn get_deployments(&self) -> impl std::future::Future<Output = Result<Vec<Resource>>> + Send;
  fn get_image(&self, name: &str) -> impl std::future::Future<Output = Result<Image>> + Send;
  fn get_autoscalers(&self) -> impl std::future::Future<Output = Result<Vec<Autoscaler>>> + Send;
}

/// Default location of the user's kubeconfig, `~/.kube/config`
pub fn default_kubeconfig() -> Result<PathBuf> {
  let home = dirs::home_dir().context("Could not locate home directory")?;
  Ok(home.join(".kube").join("config"))
}

/// Real client implementation wrapping kube-rs
pub struct RealOcpClients {
  client: kube::Client,
}

impl RealOcpClients {
  /// Connect using the given kubeconfig file (or `~/.kube/config`) and optional context
  pub async fn new(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Self> {
    let path = match kubeconfig {
      Some(path) => path.to_path_buf(),
      None => default_kubeconfig()?,
    };

    let kubeconfig =
      Kubeconfig::read_from(&path).with_context(|| format!("Unable to read kubeconfig {}", path.display()))?;
    let options = KubeConfigOptions {
      context: context.map(str::to_owned),
      ..Default::default()
    };

    let client = match kube::Config::from_custom_kubeconfig(kubeconfig, &options).await {
      Ok(config) => kube::Client::try_from(config).map_err(anyhow::Error::from),
      Err(e) => Err(anyhow::Error::from(e)),
    };

    match client {
      Ok(client) => Ok(Self { client }),
      Err(e) => {
        anyhow::bail!(
          "Unable to connect to cluster: {e}\n\n\
          Ensure the kubeconfig file at {} is present and holds a valid session.\n\
          Try: oc login",
          path.display()
        );
      }
    }
  }
}

impl OcpClients for RealOcpClients {
  async fn get_projects(&self) -> Result<Vec<Project>> {
    ocp_resources::get_projects(&self.client).await
  }

  async fn get_namespaces(&self) -> Result<Vec<String>> {
    ocp_resources::get_namespaces(&self.client).await
  }

  async fn get_groups(&self) -> Result<Vec<Group>> {
    ocp_resources::get_groups(&self.client).await
  }

  async fn get_group(&self, name: &str) -> Result<Group> {
    ocp_resources::get_group(&self.client, name).await
  }

  async fn get_users(&self) -> Result<Vec<User>> {
    ocp_resources::get_users(&self.client).await
  }

  async fn get_role_bindings(&self, namespace: &str) -> Result<Vec<RoleBinding>> {
    ocp_resources::get_role_bindings(&self.client, namespace).await
  }

  async fn get_deployment_configs(&self, namespace: Option<&str>) -> Result<Vec<DeploymentConfig>> {
    ocp_resources::get_deployment_configs(&self.client, namespace).await
  }

  async fn get_deployments(&self) -> Result<Vec<Resource>> {
    ocp_resources::get_deployments(&self.client).await
  }

  async fn get_image(&self, name: &str) -> Result<Image> {
    ocp_resources::get_image(&self.client, name).await
  }

  async fn get_autoscalers(&self) -> Result<Vec<Autoscaler>> {
    ocp_resources::get_autoscalers(&self.client).await
  }
}
