use std::collections::BTreeMap;

use anyhow::{Context, Result};
use k8s_openapi::api::{
  apps, autoscaling,
  core::v1::{Container, Namespace, PodTemplateSpec},
  rbac::v1::RoleBinding,
};
use kube::{
  Client, ResourceExt,
  api::{Api, ApiResource, DynamicObject, GroupVersionKind, ListParams},
};
use serde::{Deserialize, Serialize};

const DISPLAY_NAME_ANNOTATION: &str = "openshift.io/display-name";
const REQUESTER_ANNOTATION: &str = "openshift.io/requester";

/// OpenShift API types that are not part of `k8s-openapi`
///
/// These are reached through the dynamic API and the fields of interest are
/// deserialized from the untyped remainder of each object
fn api_resource(group: &str, version: &str, kind: &str, plural: &str) -> ApiResource {
  ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(group, version, kind), plural)
}

fn project_api_resource() -> ApiResource {
  api_resource("project.openshift.io", "v1", "Project", "projects")
}

fn group_api_resource() -> ApiResource {
  api_resource("user.openshift.io", "v1", "Group", "groups")
}

fn user_api_resource() -> ApiResource {
  api_resource("user.openshift.io", "v1", "User", "users")
}

fn deployment_config_api_resource() -> ApiResource {
  api_resource("apps.openshift.io", "v1", "DeploymentConfig", "deploymentconfigs")
}

fn image_api_resource() -> ApiResource {
  api_resource("image.openshift.io", "v1", "Image", "images")
}

/// Kind of the deployment objects an autoscaler may point at
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
  Deployment,
  DeploymentConfig,
}

impl Kind {
  /// Parses the `kind` of a scale target reference
  pub fn from_kind(kind: &str) -> Option<Self> {
    match kind {
      "Deployment" => Some(Kind::Deployment),
      "DeploymentConfig" => Some(Kind::DeploymentConfig),
      _ => None,
    }
  }
}

impl std::fmt::Display for Kind {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match *self {
      Kind::Deployment => write!(f, "Deployment"),
      Kind::DeploymentConfig => write!(f, "DeploymentConfig"),
    }
  }
}

/// Identity of a deployment object in the cluster
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Resource {
  /// Name of the resource
  pub name: String,
  /// Namespace where the resource is provisioned
  pub namespace: String,
  /// Kind of the resource
  pub kind: Kind,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub name: String,
  pub display_name: Option<String>,
  pub requester: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
  pub name: String,
  /// User identifiers, in the order the API returned them
  pub users: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub name: String,
  pub full_name: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeploymentConfig {
  pub name: String,
  pub namespace: String,
  pub containers: Vec<Container>,
}

impl DeploymentConfig {
  pub fn resource(&self) -> Resource {
    Resource {
      name: self.name.clone(),
      namespace: self.namespace.clone(),
      kind: Kind::DeploymentConfig,
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
  /// Image name, which is the `sha256:...` digest
  pub name: String,
  /// The raw docker metadata document embedded in the image object
  pub docker_image_metadata: Option<serde_json::Value>,
}

/// Target of a horizontal pod autoscaler
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleTarget {
  pub kind: String,
  pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Autoscaler {
  pub name: String,
  pub namespace: String,
  pub target: ScaleTarget,
}

#[derive(Deserialize)]
struct GroupFields {
  users: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserFields {
  full_name: Option<String>,
}

#[derive(Deserialize)]
struct DeploymentConfigFields {
  spec: Option<DeploymentConfigSpec>,
}

#[derive(Deserialize)]
struct DeploymentConfigSpec {
  template: Option<PodTemplateSpec>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageFields {
  docker_image_metadata: Option<serde_json::Value>,
}

fn annotation(obj: &DynamicObject, key: &str) -> Option<String> {
  obj.annotations().get(key).cloned()
}

fn to_group(obj: DynamicObject) -> Result<Group> {
  let name = obj.name_any();
  let fields: GroupFields =
    serde_json::from_value(obj.data).with_context(|| format!("Unable to parse group {name}"))?;

  Ok(Group {
    name,
    users: fields.users.unwrap_or_default(),
  })
}

fn to_deployment_config(obj: DynamicObject) -> Result<DeploymentConfig> {
  let name = obj.name_any();
  let namespace = obj.namespace().unwrap_or_default();
  let fields: DeploymentConfigFields = serde_json::from_value(obj.data)
    .with_context(|| format!("Unable to parse deployment config {namespace}/{name}"))?;

  let containers = fields
    .spec
    .and_then(|spec| spec.template)
    .and_then(|template| template.spec)
    .map(|spec| spec.containers)
    .unwrap_or_default();

  Ok(DeploymentConfig {
    name,
    namespace,
    containers,
  })
}

/// Returns all projects visible to the current user
pub async fn get_projects(client: &Client) -> Result<Vec<Project>> {
  let api: Api<DynamicObject> = Api::all_with(client.clone(), &project_api_resource());
  let project_list = api.list(&ListParams::default()).await.context("Unable to list projects")?;

  let projects = project_list
    .items
    .iter()
    .map(|obj| Project {
      name: obj.name_any(),
      display_name: annotation(obj, DISPLAY_NAME_ANNOTATION),
      requester: annotation(obj, REQUESTER_ANNOTATION),
    })
    .collect();

  Ok(projects)
}

/// Returns the names of all namespaces in the cluster
pub async fn get_namespaces(client: &Client) -> Result<Vec<String>> {
  let api: Api<Namespace> = Api::all(client.clone());
  let namespace_list = api.list(&ListParams::default()).await.context("Unable to list namespaces")?;

  Ok(namespace_list.items.iter().map(|ns| ns.name_any()).collect())
}

pub async fn get_groups(client: &Client) -> Result<Vec<Group>> {
  let api: Api<DynamicObject> = Api::all_with(client.clone(), &group_api_resource());
  let group_list = api.list(&ListParams::default()).await.context("Unable to list groups")?;

  group_list.items.into_iter().map(to_group).collect()
}

pub async fn get_group(client: &Client, name: &str) -> Result<Group> {
  let api: Api<DynamicObject> = Api::all_with(client.clone(), &group_api_resource());
  let obj = api.get(name).await.with_context(|| format!("Unable to get group {name}"))?;

  to_group(obj)
}

pub async fn get_users(client: &Client) -> Result<Vec<User>> {
  let api: Api<DynamicObject> = Api::all_with(client.clone(), &user_api_resource());
  let user_list = api.list(&ListParams::default()).await.context("Unable to list users")?;

  user_list
    .items
    .into_iter()
    .map(|obj| {
      let name = obj.name_any();
      let fields: UserFields =
        serde_json::from_value(obj.data).with_context(|| format!("Unable to parse user {name}"))?;
      Ok(User {
        name,
        full_name: fields.full_name,
      })
    })
    .collect()
}

pub async fn get_role_bindings(client: &Client, namespace: &str) -> Result<Vec<RoleBinding>> {
  let api: Api<RoleBinding> = Api::namespaced(client.clone(), namespace);
  let binding_list = api
    .list(&ListParams::default())
    .await
    .with_context(|| format!("Unable to list role bindings in {namespace}"))?;

  Ok(binding_list.items)
}

/// Returns the deployment configs of one namespace, or of the whole cluster when `namespace` is `None`
pub async fn get_deployment_configs(client: &Client, namespace: Option<&str>) -> Result<Vec<DeploymentConfig>> {
  let ar = deployment_config_api_resource();
  let api: Api<DynamicObject> = match namespace {
    Some(namespace) => Api::namespaced_with(client.clone(), namespace, &ar),
    None => Api::all_with(client.clone(), &ar),
  };
  let dc_list = api
    .list(&ListParams::default())
    .await
    .with_context(|| format!("Unable to list deployment configs in {}", namespace.unwrap_or("all namespaces")))?;

  dc_list.items.into_iter().map(to_deployment_config).collect()
}

pub async fn get_deployments(client: &Client) -> Result<Vec<Resource>> {
  let api: Api<apps::v1::Deployment> = Api::all(client.clone());
  let deployment_list = api.list(&ListParams::default()).await.context("Unable to list deployments")?;

  let deployments = deployment_list
    .items
    .iter()
    .map(|dplmnt| Resource {
      name: dplmnt.name_any(),
      namespace: dplmnt.namespace().unwrap_or_default(),
      kind: Kind::Deployment,
    })
    .collect();

  Ok(deployments)
}

/// Get the image identified by its digest, e.g. `sha256:de16...`
pub async fn get_image(client: &Client, name: &str) -> Result<Image> {
  let api: Api<DynamicObject> = Api::all_with(client.clone(), &image_api_resource());
  let obj = api.get(name).await.with_context(|| format!("Unable to get image {name}"))?;

  let fields: ImageFields =
    serde_json::from_value(obj.data).with_context(|| format!("Unable to parse image {name}"))?;

  Ok(Image {
    name: name.to_owned(),
    docker_image_metadata: fields.docker_image_metadata,
  })
}

pub async fn get_autoscalers(client: &Client) -> Result<Vec<Autoscaler>> {
  let api: Api<autoscaling::v1::HorizontalPodAutoscaler> = Api::all(client.clone());
  let hpa_list = api
    .list(&ListParams::default())
    .await
    .context("Unable to list horizontal pod autoscalers")?;

  let autoscalers = hpa_list
    .items
    .iter()
    .map(|hpa| {
      let target = hpa
        .spec
        .as_ref()
        .map(|spec| ScaleTarget {
          kind: spec.scale_target_ref.kind.clone(),
          name: spec.scale_target_ref.name.clone(),
        })
        .unwrap_or_default();

      Autoscaler {
        name: hpa.name_any(),
        namespace: hpa.namespace().unwrap_or_default(),
        target,
      }
    })
    .collect();

  Ok(autoscalers)
}

/// Labels of the image config found in the docker metadata document
///
/// Returns an empty map when the document has no `Config.Labels` object
pub fn image_labels(metadata: &serde_json::Value) -> BTreeMap<String, String> {
  metadata
    .pointer("/Config/Labels")
    .and_then(|labels| labels.as_object())
    .map(|labels| {
      labels
        .iter()
        .filter_map(|(key, value)| value.as_str().map(|value| (key.to_owned(), value.to_owned())))
        .collect()
    })
    .unwrap_or_default()
}
