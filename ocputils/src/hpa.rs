use std::collections::HashSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
  clients::OcpClients,
  ocp::{Autoscaler, Kind, Resource},
};

/// An autoscaler whose scale target does not exist
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrokenAutoscaler {
  pub namespace: String,
  pub name: String,
  pub target_kind: Kind,
  pub target_name: String,
}

impl std::fmt::Display for BrokenAutoscaler {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{}/{}", self.namespace, self.name)
  }
}

/// Deployment objects of the cluster, fetched once up front
#[derive(Debug, Default)]
pub struct TargetCache {
  targets: HashSet<Resource>,
}

impl TargetCache {
  pub async fn load<C: OcpClients>(client: &C) -> Result<Self> {
    let mut targets: HashSet<Resource> = client
      .get_deployment_configs(None)
      .await?
      .iter()
      .map(|dc| dc.resource())
      .collect();
    targets.extend(client.get_deployments().await?);

    Ok(Self { targets })
  }

  pub fn from_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
    Self {
      targets: resources.into_iter().collect(),
    }
  }

  pub fn contains(&self, kind: Kind, namespace: &str, name: &str) -> bool {
    self.targets.contains(&Resource {
      name: name.to_owned(),
      namespace: namespace.to_owned(),
      kind,
    })
  }
}

/// Autoscalers targeting a deployment or deployment config that is not in the cache, sorted
pub fn find_broken(autoscalers: &[Autoscaler], cache: &TargetCache) -> Vec<BrokenAutoscaler> {
  let mut broken: Vec<BrokenAutoscaler> = autoscalers
    .iter()
    .filter_map(|hpa| {
      let Some(kind) = Kind::from_kind(&hpa.target.kind) else {
        debug!(
          "{}/{}: references unknown scalable resource {}, skipping",
          hpa.namespace, hpa.name, hpa.target.kind
        );
        return None;
      };

      if cache.contains(kind, &hpa.namespace, &hpa.target.name) {
        return None;
      }

      Some(BrokenAutoscaler {
        namespace: hpa.namespace.clone(),
        name: hpa.name.clone(),
        target_kind: kind,
        target_name: hpa.target.name.clone(),
      })
    })
    .collect();
  broken.sort();

  broken
}

/// List all autoscalers and report those pointing at missing deployment objects
///
/// Every API call here is fatal on failure.
pub async fn broken_autoscalers<C: OcpClients>(client: &C) -> Result<Vec<BrokenAutoscaler>> {
  let cache = TargetCache::load(client).await?;
  let autoscalers = client.get_autoscalers().await?;
  info!("Checking {} autoscalers", autoscalers.len());

  Ok(find_broken(&autoscalers, &cache))
}

pub fn to_text(broken: &[BrokenAutoscaler]) -> String {
  broken.iter().map(|b| format!("{b}\n")).collect()
}
