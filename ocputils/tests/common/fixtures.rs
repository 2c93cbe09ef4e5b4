use std::collections::HashMap;

use k8s_openapi::api::{
  core::v1::Container,
  rbac::v1::{RoleBinding, RoleRef, Subject},
};
use serde_json::json;

use ocputils::ocp::{Autoscaler, DeploymentConfig, Group, Image, Kind, Project, Resource, ScaleTarget, User};

use super::mock_ocp::MockOcpClients;

pub fn project(name: &str) -> Project {
  Project {
    name: name.into(),
    ..Default::default()
  }
}

/// Role binding of a cluster role to a list of `(kind, name)` subjects
pub fn binding(role: &str, subjects: &[(&str, &str)]) -> RoleBinding {
  RoleBinding {
    role_ref: RoleRef {
      api_group: "rbac.authorization.k8s.io".into(),
      kind: "ClusterRole".into(),
      name: role.into(),
    },
    subjects: Some(
      subjects
        .iter()
        .map(|(kind, name)| Subject {
          kind: kind.to_string(),
          name: name.to_string(),
          ..Default::default()
        })
        .collect(),
    ),
    ..Default::default()
  }
}

pub fn container(name: &str, image: &str) -> Container {
  Container {
    name: name.into(),
    image: Some(image.into()),
    ..Default::default()
  }
}

pub fn deployment_config(namespace: &str, name: &str, containers: Vec<Container>) -> DeploymentConfig {
  DeploymentConfig {
    name: name.into(),
    namespace: namespace.into(),
    containers,
  }
}

pub fn image(digest: &str, labels: serde_json::Value) -> Image {
  Image {
    name: digest.into(),
    docker_image_metadata: Some(json!({ "Config": { "Labels": labels } })),
  }
}

pub fn autoscaler(namespace: &str, name: &str, kind: &str, target: &str) -> Autoscaler {
  Autoscaler {
    name: name.into(),
    namespace: namespace.into(),
    target: ScaleTarget {
      kind: kind.into(),
      name: target.into(),
    },
  }
}

pub fn group(name: &str, users: &[&str]) -> Group {
  Group {
    name: name.into(),
    users: users.iter().map(|u| u.to_string()).collect(),
  }
}

pub fn user(name: &str, full_name: Option<&str>) -> User {
  User {
    name: name.into(),
    full_name: full_name.map(str::to_owned),
  }
}

/// Builds a cluster hosting the `payments` and `orders` applications next to
/// platform namespaces and a namespace that follows no naming convention
///
/// `orders-dev` denies listing both its role bindings and its deployment configs.
pub fn cluster() -> MockOcpClients {
  let namespaces = [
    "payments-ci",
    "payments-sit",
    "payments-prod-ready",
    "orders-dev",
    "kube-system",
    "openshift-monitoring",
    "legacyapp-foo",
  ];

  let role_bindings = HashMap::from([
    (
      "payments-ci".to_string(),
      vec![
        binding("admin", &[("Group", "payments-owners")]),
        binding("edit", &[("Group", "payments-devs")]),
        binding("edit", &[("User", "t100"), ("Group", "ignored-devs")]),
        binding("view", &[("Group", "auditors")]),
        binding("system:image-puller", &[("Group", "system:serviceaccounts")]),
      ],
    ),
    (
      "payments-sit".to_string(),
      vec![
        binding("admin", &[("Group", "payments-owners")]),
        binding("view", &[("Group", "payments-ops")]),
        binding("view", &[("Group", "auditors")]),
      ],
    ),
    (
      "payments-prod-ready".to_string(),
      vec![binding("admin", &[("Group", "legacy-admins")])],
    ),
  ]);

  let deployment_configs = vec![
    deployment_config(
      "payments-sit",
      "api",
      vec![
        container("api", "registry.example.com/payments-sit/api@sha256:aaa"),
        container("sidecar", "registry.example.com/mesh/proxy@sha256:sss"),
        container("worker", "registry.example.com/payments-sit/worker:latest"),
      ],
    ),
    deployment_config(
      "payments-ci",
      "batch",
      vec![container("batch", "registry.example.com/payments-ci/batch@sha256:bbb")],
    ),
    deployment_config(
      "payments-ci",
      "web",
      vec![
        container("web", "registry.example.com/payments-ci/web@sha256:ccc"),
        container("cron", "registry.example.com/payments-ci/cron@sha256:gone"),
      ],
    ),
    deployment_config(
      "orders-dev",
      "web",
      vec![container("web", "registry.example.com/orders-dev/web@sha256:ddd")],
    ),
  ];

  let images = HashMap::from([
    (
      "sha256:aaa".to_string(),
      image(
        "sha256:aaa",
        json!({ "no.example.git.url": "ssh://git@git.example.com:7999/payments/api.git" }),
      ),
    ),
    ("sha256:bbb".to_string(), image("sha256:bbb", json!({ "maintainer": "payments" }))),
    (
      "sha256:ccc".to_string(),
      image("sha256:ccc", json!({ "git.url": "git.example.com/web" })),
    ),
  ]);

  MockOcpClients {
    projects: namespaces.iter().map(|n| project(n)).collect(),
    namespaces: namespaces.iter().map(|n| n.to_string()).collect(),
    groups: vec![
      group("payments-owners", &["t200", "t100"]),
      group("auditors", &["t300"]),
      group("empty", &[]),
    ],
    users: vec![
      user("t100", Some("Ola Nordmann")),
      user("t200", Some("Kari Nordmann")),
      user("t300", None),
    ],
    role_bindings,
    deployment_configs,
    deployments: vec![Resource {
      name: "frontend".into(),
      namespace: "payments-sit".into(),
      kind: Kind::Deployment,
    }],
    images,
    autoscalers: vec![
      autoscaler("payments-sit", "api", "DeploymentConfig", "api"),
      autoscaler("payments-sit", "frontend", "Deployment", "frontend"),
      autoscaler("payments-sit", "old", "DeploymentConfig", "retired"),
      autoscaler("orders-dev", "web", "Deployment", "web"),
      autoscaler("payments-ci", "db", "StatefulSet", "db"),
    ],
    failing_namespaces: ["orders-dev".to_string()].into(),
    ..Default::default()
  }
}
