use std::collections::HashMap;

use anyhow::Result;

use crate::{clients::OcpClients, ocp::User};

/// User identifiers mapped to display names, loaded once per run
#[derive(Clone, Debug, Default)]
pub struct UserCache {
  users: HashMap<String, String>,
}

impl UserCache {
  pub async fn load<C: OcpClients>(client: &C) -> Result<Self> {
    let users = client.get_users().await?;
    Ok(Self::from_users(users))
  }

  pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
    let users = users
      .into_iter()
      .map(|user| (user.name, user.full_name.unwrap_or_default()))
      .collect();

    Self { users }
  }

  /// Full name of the user, or an empty string for an unknown identifier
  pub fn full_name(&self, uid: &str) -> &str {
    self.users.get(uid).map(String::as_str).unwrap_or_default()
  }

  #[cfg(test)]
  fn len(&self) -> usize {
    self.users.len()
  }

  #[cfg(test)]
  fn is_empty(&self) -> bool {
    self.users.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(name: &str, full_name: Option<&str>) -> User {
    User {
      name: name.into(),
      full_name: full_name.map(Into::into),
    }
  }

  #[test]
  fn full_name_lookup() {
    let cache = UserCache::from_users(vec![user("t123456", Some("Kari Nordmann")), user("svc", None)]);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.full_name("t123456"), "Kari Nordmann");
    assert_eq!(cache.full_name("svc"), "");
  }

  #[test]
  fn unknown_user_is_empty() {
    let cache = UserCache::default();
    assert!(cache.is_empty());
    assert_eq!(cache.full_name("nobody"), "");
  }
}
